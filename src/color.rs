use glam::{vec3, Vec3};

/// Converts a hue/saturation/lightness triple, each in `[0, 1]`, to RGB.
///
/// Hue wraps around, so `1.25` is treated as `0.25`. Saturation and lightness
/// are clamped.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let h = hue.rem_euclid(1.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let q = if l <= 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    vec3(
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
    .clamp(Vec3::ZERO, Vec3::ONE)
}

/// Decodes sRGB-encoded components to linear light, for writing into sRGB
/// render targets that encode on store.
pub fn srgb_to_linear(color: Vec3) -> Vec3 {
    vec3(
        srgb_channel_to_linear(color.x),
        srgb_channel_to_linear(color.y),
        srgb_channel_to_linear(color.z),
    )
}

pub fn srgb_channel_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).abs().max_element() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_primary_hues() {
        assert_close(hsl_to_rgb(0.0, 1.0, 0.5), vec3(1.0, 0.0, 0.0));
        assert_close(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), vec3(0.0, 1.0, 0.0));
        assert_close(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_grey_without_saturation() {
        assert_close(hsl_to_rgb(0.7, 0.0, 0.6), Vec3::splat(0.6));
    }

    #[test]
    fn test_hue_wraps() {
        assert_close(hsl_to_rgb(1.25, 0.8, 0.6), hsl_to_rgb(0.25, 0.8, 0.6));
        assert_close(hsl_to_rgb(-0.75, 0.8, 0.6), hsl_to_rgb(0.25, 0.8, 0.6));
    }

    #[test]
    fn test_cyan_at_field_saturation() {
        // s = 0.8, l = 0.6 -> q = 0.92, p = 0.28
        assert_close(hsl_to_rgb(0.5, 0.8, 0.6), vec3(0.28, 0.92, 0.92));
    }

    #[test]
    fn test_srgb_to_linear() {
        assert_eq!(srgb_channel_to_linear(0.0), 0.0);
        assert!((srgb_channel_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!((srgb_channel_to_linear(0.02) - 0.02 / 12.92).abs() < 1e-7);
        assert!((srgb_channel_to_linear(0.5) - 0.214_041).abs() < 1e-5);

        // #0c0c0c page background
        let background = srgb_to_linear(Vec3::splat(0.047));
        assert!((background.x - 0.003_671).abs() < 1e-5, "{:?}", background);
    }

    #[test]
    fn test_srgb_to_linear_darkens_field_colors() {
        let srgb = hsl_to_rgb(0.5, 0.8, 0.6);
        let linear = srgb_to_linear(srgb);
        assert!(linear.cmplt(srgb).all());
        assert_close(linear, vec3(0.063_724, 0.827_571, 0.827_571));
    }
}
