use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use screenmatch::{
    CcoeffNormed, ImageView, Match, MatchConfig, Matcher, OwnedImage, Pattern, Rect,
    ScreenMatchError, ScreenMatchResult, Template,
};
use std::sync::Arc;

fn black_with_squares(size: usize, squares: &[(usize, usize)]) -> OwnedImage {
    let mut img = OwnedImage::filled(size, size, 0).unwrap();
    for &(x, y) in squares {
        img.fill_rect(x, y, 10, 10, 255);
    }
    img
}

fn white_square() -> OwnedImage {
    OwnedImage::filled(10, 10, 255).unwrap()
}

fn random_image(rng: &mut StdRng, width: usize, height: usize) -> OwnedImage {
    let data = (0..width * height).map(|_| rng.random::<u8>()).collect();
    OwnedImage::new(data, width, height).unwrap()
}

fn brute_force_score(context: ImageView<'_, u8>, search: ImageView<'_, u8>, x: usize, y: usize) -> f64 {
    let (w, h) = (search.width(), search.height());
    let n = (w * h) as f64;
    let mut pairs = Vec::with_capacity(w * h);
    for yy in 0..h {
        for xx in 0..w {
            let t = f64::from(*search.get(xx, yy).unwrap());
            let i = f64::from(*context.get(x + xx, y + yy).unwrap());
            pairs.push((t, i));
        }
    }
    let mean_t = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_i = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let mut num = 0.0;
    let mut var_t = 0.0;
    let mut var_i = 0.0;
    for (t, i) in pairs {
        num += (t - mean_t) * (i - mean_i);
        var_t += (t - mean_t) * (t - mean_t);
        var_i += (i - mean_i) * (i - mean_i);
    }
    (num / (var_t * var_i).sqrt()).clamp(-1.0, 1.0)
}

#[test]
fn locates_single_white_square() {
    let screen = black_with_squares(100, &[(40, 40)]);
    let best = CcoeffNormed::new()
        .find_best(screen.view(), white_square().view())
        .unwrap();
    assert_eq!(best.rect, Rect::new(40, 40, 10, 10));
    assert!((best.similarity - 1.0).abs() < 1e-6);
}

#[test]
fn absent_square_scores_below_acceptance() {
    let screen = black_with_squares(100, &[]);
    let best = CcoeffNormed::new()
        .find_best(screen.view(), white_square().view())
        .unwrap();
    assert!(best.similarity < 0.9);
}

#[test]
fn finds_every_separated_square() {
    let screen = black_with_squares(100, &[(0, 0), (50, 50), (90, 90)]);
    let mut found = CcoeffNormed::new()
        .find_all(screen.view(), white_square().view(), 0.9)
        .unwrap();
    found.sort_by_key(|m| (m.rect.x, m.rect.y));

    let corners: Vec<(i32, i32)> = found.iter().map(|m| (m.rect.x, m.rect.y)).collect();
    assert_eq!(corners, vec![(0, 0), (50, 50), (90, 90)]);
    assert!(found.iter().all(|m| m.similarity >= 0.9));
}

#[test]
fn threshold_above_every_peak_returns_nothing() {
    let mut rng = StdRng::seed_from_u64(7);
    let screen = random_image(&mut rng, 60, 40);
    let search = random_image(&mut rng, 8, 6);
    let matcher = CcoeffNormed::new();

    let best = matcher.find_best(screen.view(), search.view()).unwrap();
    assert!(best.similarity < 1.0);
    let threshold = best.similarity + (1.0 - best.similarity) / 2.0;
    let found = matcher
        .find_all(screen.view(), search.view(), threshold)
        .unwrap();
    assert!(found.is_empty());
}

#[test]
fn best_match_agrees_with_brute_force() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..4 {
        let screen = random_image(&mut rng, 40, 30);
        let search = random_image(&mut rng, 7, 5);
        let best = CcoeffNormed::new()
            .find_best(screen.view(), search.view())
            .unwrap();

        let mut oracle = (0, 0, f64::NEG_INFINITY);
        for y in 0..=30 - 5 {
            for x in 0..=40 - 7 {
                let score = brute_force_score(screen.view(), search.view(), x, y);
                if score > oracle.2 {
                    oracle = (x, y, score);
                }
            }
        }
        assert_eq!((best.rect.x, best.rect.y), (oracle.0 as i32, oracle.1 as i32));
        assert!((f64::from(best.similarity) - oracle.2).abs() < 1e-4);
    }
}

#[test]
fn extracted_matches_respect_suppression_window() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut screen = random_image(&mut rng, 90, 70);
    let search = random_image(&mut rng, 8, 8);
    for &(x, y) in &[(5, 5), (40, 20), (70, 55)] {
        screen.paste(search.view(), x, y);
    }

    let found = CcoeffNormed::new()
        .find_all(screen.view(), search.view(), 0.2)
        .unwrap();
    assert!(found.len() >= 3);
    for &(x, y) in &[(5, 5), (40, 20), (70, 55)] {
        assert!(found
            .iter()
            .any(|m| m.rect == Rect::new(x, y, 8, 8) && m.similarity > 0.999));
    }

    let half = 4;
    for (i, a) in found.iter().enumerate() {
        for b in &found[i + 1..] {
            let dx = (a.rect.x - b.rect.x).abs();
            let dy = (a.rect.y - b.rect.y).abs();
            assert!(dx >= half || dy >= half, "{a:?} and {b:?} overlap");
        }
    }
}

#[test]
fn wider_suppression_keeps_fewer_matches() {
    let mut rng = StdRng::seed_from_u64(11);
    let screen = random_image(&mut rng, 64, 48);
    let search = random_image(&mut rng, 6, 6);

    let narrow = CcoeffNormed::with_config(MatchConfig {
        suppression_ratio: 0.2,
        ..MatchConfig::default()
    })
    .unwrap();
    let wide = CcoeffNormed::with_config(MatchConfig {
        suppression_ratio: 1.0,
        ..MatchConfig::default()
    })
    .unwrap();

    let many = narrow.find_all(screen.view(), search.view(), 0.0).unwrap();
    let few = wide.find_all(screen.view(), search.view(), 0.0).unwrap();
    assert!(few.len() <= many.len());
    assert!(!few.is_empty());
}

/// Peaks are pairwise at least `max(floor(ratio * size), 1)` apart on one
/// axis, so each tile of that size over the surface holds at most one.
fn tile_bound(screen: &OwnedImage, search: &OwnedImage, ratio: f32) -> usize {
    let surf_w = screen.width() - search.width() + 1;
    let surf_h = screen.height() - search.height() + 1;
    let step_w = ((search.width() as f32 * ratio) as usize).max(1);
    let step_h = ((search.height() as f32 * ratio) as usize).max(1);
    surf_w.div_ceil(step_w) * surf_h.div_ceil(step_h)
}

#[test]
fn zero_threshold_stays_within_tile_bound() {
    let mut rng = StdRng::seed_from_u64(5);
    for &(size, tpl) in &[(30, 6), (64, 7), (120, 10)] {
        let screen = random_image(&mut rng, size, size);
        let search = random_image(&mut rng, tpl, tpl);
        for ratio in [0.25, 0.5, 1.0] {
            let matcher = CcoeffNormed::with_config(MatchConfig {
                suppression_ratio: ratio,
                ..MatchConfig::default()
            })
            .unwrap();
            let found = matcher
                .find_all(screen.view(), search.view(), 0.0)
                .unwrap();
            let bound = tile_bound(&screen, &search, ratio);
            assert!(!found.is_empty());
            assert!(
                found.len() <= bound,
                "{} matches exceed bound {bound} ({size}x{size}, {tpl}x{tpl}, ratio {ratio})",
                found.len()
            );
            assert!(found.iter().all(|m| m.similarity >= 0.0));
        }
    }
}

#[test]
fn flat_pattern_with_zero_threshold_is_degenerate() {
    let mut rng = StdRng::seed_from_u64(5);
    let screen = random_image(&mut rng, 30, 30);
    // Flat search images never score below zero, so every placement clears
    // the threshold and both blank blocks match.
    let search = OwnedImage::filled(2, 1, 0).unwrap();
    let err = CcoeffNormed::new()
        .find_all(screen.view(), search.view(), 0.0)
        .err()
        .unwrap();
    assert!(matches!(err, ScreenMatchError::DegeneratePattern { .. }));
}

#[test]
fn negative_threshold_is_degenerate_on_random_images() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..3 {
        let screen = random_image(&mut rng, 32, 24);
        let search = random_image(&mut rng, 5, 5);
        let err = CcoeffNormed::new()
            .find_all(screen.view(), search.view(), -1.0)
            .err()
            .unwrap();
        assert!(matches!(err, ScreenMatchError::DegeneratePattern { .. }));
    }
}

#[test]
fn oversized_pattern_is_rejected() {
    let screen = OwnedImage::filled(10, 10, 0).unwrap();
    let search = OwnedImage::filled(20, 5, 255).unwrap();
    let err = CcoeffNormed::new()
        .find_best(screen.view(), search.view())
        .err()
        .unwrap();
    assert_eq!(
        err,
        ScreenMatchError::PatternLargerThanContext {
            search_width: 20,
            search_height: 5,
            context_width: 10,
            context_height: 10,
        }
    );
}

#[test]
fn pattern_applies_its_threshold() {
    let screen = black_with_squares(100, &[(40, 40)]);
    let pattern = Pattern::new(Template::from(white_square()))
        .with_threshold(0.9)
        .unwrap();
    let found = pattern.find_in(screen.view()).unwrap().unwrap();
    assert_eq!(found.rect, Rect::new(40, 40, 10, 10));

    let empty = black_with_squares(100, &[]);
    assert!(pattern.find_in(empty.view()).unwrap().is_none());
    assert!(pattern.best_in(empty.view()).unwrap().similarity < 0.9);

    assert!(Pattern::new(Template::from(white_square()))
        .with_threshold(1.5)
        .is_err());
}

#[derive(Debug)]
struct FixedMatcher(Match);

impl Matcher for FixedMatcher {
    fn find_best(
        &self,
        _context: ImageView<'_, u8>,
        _search: ImageView<'_, u8>,
    ) -> ScreenMatchResult<Match> {
        Ok(self.0)
    }

    fn find_all(
        &self,
        _context: ImageView<'_, u8>,
        _search: ImageView<'_, u8>,
        threshold: f32,
    ) -> ScreenMatchResult<Vec<Match>> {
        Ok((self.0.similarity >= threshold)
            .then_some(self.0)
            .into_iter()
            .collect())
    }
}

#[test]
fn pattern_uses_injected_matcher() {
    let fixed = Match::new(Rect::new(3, 4, 10, 10), 0.8);
    let pattern = Pattern::new(Template::from(white_square()))
        .with_matcher(Arc::new(FixedMatcher(fixed)))
        .with_threshold(0.7)
        .unwrap()
        .with_name("fixed");
    let screen = black_with_squares(100, &[]);

    assert_eq!(pattern.find_in(screen.view()).unwrap(), Some(fixed));
    assert_eq!(pattern.find_all_in(screen.view()).unwrap(), vec![fixed]);
    assert_eq!(pattern.name(), Some("fixed"));
}
