/// Quadratic ease-in-ease-out on `t` in `[0, 1]`.
pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - 2.0 * (1.0 - t) * (1.0 - t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_midpoint() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(0.5), 0.5);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
    }

    #[test]
    fn curve_is_monotonic() {
        let mut last = 0.0;
        for i in 1..=100 {
            let v = ease_in_out_quad(i as f32 / 100.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn curve_is_symmetric() {
        for t in [0.1_f32, 0.25, 0.4] {
            let a = ease_in_out_quad(t);
            let b = 1.0 - ease_in_out_quad(1.0 - t);
            assert!((a - b).abs() < 1e-6);
        }
    }
}
