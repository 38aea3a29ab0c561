use screenmatch::{
    CcoeffNormed, CorrelationSurface, ImageView, Match, OwnedImage, Pattern, Rect,
    ScreenMatchError, Template,
};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        ScreenMatchError::InvalidImage {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        ScreenMatchError::InvalidImage {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        ScreenMatchError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0u8; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, ScreenMatchError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn image_view_roi_keeps_parent_stride() {
    let data: Vec<u8> = (0u8..16).collect();
    let view = ImageView::from_slice(&data, 4, 4).unwrap();

    let roi = view.roi(1, 1, 2, 2).unwrap();
    assert_eq!(roi.width(), 2);
    assert_eq!(roi.height(), 2);
    assert_eq!(roi.stride(), 4);
    assert_eq!(roi.row(0).unwrap(), &[5, 6]);
    assert_eq!(roi.row(1).unwrap(), &[9, 10]);

    let err = view.roi(3, 3, 2, 2).err().unwrap();
    assert!(matches!(err, ScreenMatchError::RoiOutOfBounds { .. }));
}

#[test]
fn owned_image_copies_strided_views() {
    let data: Vec<u8> = (0u8..20).collect();
    let view = ImageView::new(&data, 3, 4, 5).unwrap();
    let owned = OwnedImage::from_view(view).unwrap();
    assert_eq!(owned.width(), 3);
    assert_eq!(owned.height(), 4);
    assert_eq!(owned.data(), &[0, 1, 2, 5, 6, 7, 10, 11, 12, 15, 16, 17]);
}

#[test]
fn template_rejects_mismatched_buffer() {
    let err = Template::new(vec![0u8; 5], 2, 3).err().unwrap();
    assert_eq!(err, ScreenMatchError::BufferTooSmall { needed: 6, got: 5 });

    let template = Template::new(vec![7u8; 6], 2, 3).unwrap();
    assert_eq!((template.width(), template.height()), (2, 3));
}

#[test]
fn surface_extrema_skip_suppressed_cells() {
    #[rustfmt::skip]
    let scores = vec![
        0.1, 0.9, 0.2,
        0.4, -0.5, 0.9,
    ];
    let mut surface = CorrelationSurface::from_scores(scores, 3, 2).unwrap();

    let best = surface.max().unwrap();
    assert_eq!((best.x, best.y), (1, 0));
    let low = surface.min().unwrap();
    assert_eq!((low.x, low.y), (1, 1));

    assert_eq!(surface.zero_rect(0, 0, 2, 2), 4);
    assert_eq!(surface.remaining(), 2);
    let best = surface.max().unwrap();
    assert_eq!((best.x, best.y, best.value), (2, 1, 0.9));
    assert_eq!(surface.get(1, 0), Some(0.0));

    assert_eq!(surface.zero_rect(0, 0, 3, 2), 2);
    assert!(surface.max().is_none());
    assert!(surface.min().is_none());
}

#[test]
fn rect_helpers_follow_exclusive_edges() {
    let rect = Rect::new(40, 40, 10, 10).offset(5, -5);
    assert_eq!((rect.x, rect.y), (45, 35));
    assert_eq!((rect.right(), rect.bottom()), (55, 45));
    assert!(rect.contains(54, 44));
    assert!(!rect.contains(55, 44));
}

#[test]
fn shared_types_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Pattern>();
    assert_send_sync::<CcoeffNormed>();
    assert_send_sync::<Match>();
    assert_send_sync::<OwnedImage>();
}
