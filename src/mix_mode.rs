//! Blend modes for combining a base texture with a layer texture.
//!
//! The numeric id of each mode is uploaded to the scene shader, which
//! implements the same table as [`MixMode::mix`]. Channel values are
//! expected in `[0, 1]`; separable modes work per channel, while
//! [`Hue`](MixMode::Hue), [`Saturation`](MixMode::Saturation),
//! [`Color`](MixMode::Color) and [`Luminosity`](MixMode::Luminosity) mix
//! whole colors using Rec. 601 luminance weights.

use crate::math::{Vec3, Vec4};

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MixMode {
    #[default]
    Multiply = 0,
    Add = 1,
    Subtract = 2,
    Divide = 3,
    Screen = 4,
    Overlay = 5,
    Darken = 6,
    Lighten = 7,
    Difference = 8,
    Exclusion = 9,
    SoftLight = 10,
    HardLight = 11,
    ColorDodge = 12,
    ColorBurn = 13,
    LinearDodge = 14,
    LinearBurn = 15,
    LinearLight = 16,
    VividLight = 17,
    PinLight = 18,
    HardMix = 19,
    Reflect = 20,
    Glow = 21,
    Phoenix = 22,
    Hue = 23,
    Saturation = 24,
    Color = 25,
    Luminosity = 26,
}

impl MixMode {
    /// Every mode, in id order.
    pub const ALL: [MixMode; 27] = [
        MixMode::Multiply,
        MixMode::Add,
        MixMode::Subtract,
        MixMode::Divide,
        MixMode::Screen,
        MixMode::Overlay,
        MixMode::Darken,
        MixMode::Lighten,
        MixMode::Difference,
        MixMode::Exclusion,
        MixMode::SoftLight,
        MixMode::HardLight,
        MixMode::ColorDodge,
        MixMode::ColorBurn,
        MixMode::LinearDodge,
        MixMode::LinearBurn,
        MixMode::LinearLight,
        MixMode::VividLight,
        MixMode::PinLight,
        MixMode::HardMix,
        MixMode::Reflect,
        MixMode::Glow,
        MixMode::Phoenix,
        MixMode::Hue,
        MixMode::Saturation,
        MixMode::Color,
        MixMode::Luminosity,
    ];

    /// The id the shader switches on.
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i32) -> Option<Self> {
        usize::try_from(id).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    /// Blends `layer` over `base`. The result keeps the alpha of `base`.
    pub fn mix(self, base: Vec4, layer: Vec4) -> Vec4 {
        let b = base.xyz();
        let l = layer.xyz();
        let rgb = match self {
            MixMode::Hue => set_lum(set_sat(l, sat(b)), lum(b)),
            MixMode::Saturation => set_lum(set_sat(b, sat(l)), lum(b)),
            MixMode::Color => set_lum(l, lum(b)),
            MixMode::Luminosity => set_lum(b, lum(l)),
            separable => Vec3::new(
                separable.channel(b.x, l.x),
                separable.channel(b.y, l.y),
                separable.channel(b.z, l.z),
            ),
        };
        Vec4::from_vec3(rgb, base.w)
    }

    fn channel(self, a: f32, b: f32) -> f32 {
        match self {
            MixMode::Multiply => a * b,
            MixMode::Add | MixMode::LinearDodge => (a + b).min(1.0),
            MixMode::Subtract => (a - b).max(0.0),
            MixMode::Divide => {
                if b == 0.0 {
                    1.0
                } else {
                    (a / b).min(1.0)
                }
            }
            MixMode::Screen => screen(a, b),
            MixMode::Overlay => hard_light(b, a),
            MixMode::Darken => a.min(b),
            MixMode::Lighten => a.max(b),
            MixMode::Difference => (a - b).abs(),
            MixMode::Exclusion => a + b - 2.0 * a * b,
            MixMode::SoftLight => soft_light(a, b),
            MixMode::HardLight => hard_light(a, b),
            MixMode::ColorDodge => color_dodge(a, b),
            MixMode::ColorBurn => color_burn(a, b),
            MixMode::LinearBurn => (a + b - 1.0).max(0.0),
            MixMode::LinearLight => (a + 2.0 * b - 1.0).clamp(0.0, 1.0),
            MixMode::VividLight => vivid_light(a, b),
            MixMode::PinLight => {
                if b < 0.5 {
                    a.min(2.0 * b)
                } else {
                    a.max(2.0 * (b - 0.5))
                }
            }
            MixMode::HardMix => {
                if vivid_light(a, b) < 0.5 {
                    0.0
                } else {
                    1.0
                }
            }
            MixMode::Reflect => reflect(a, b),
            MixMode::Glow => reflect(b, a),
            MixMode::Phoenix => a.min(b) - a.max(b) + 1.0,
            MixMode::Hue | MixMode::Saturation | MixMode::Color | MixMode::Luminosity => b,
        }
    }
}

impl TryFrom<i32> for MixMode {
    type Error = i32;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(id)
    }
}

fn screen(a: f32, b: f32) -> f32 {
    1.0 - (1.0 - a) * (1.0 - b)
}

/// Hard light with `a` as the backdrop; overlay is the same with the
/// arguments swapped.
fn hard_light(a: f32, b: f32) -> f32 {
    if b <= 0.5 {
        a * 2.0 * b
    } else {
        screen(a, 2.0 * b - 1.0)
    }
}

fn soft_light(a: f32, b: f32) -> f32 {
    if b <= 0.5 {
        a - (1.0 - 2.0 * b) * a * (1.0 - a)
    } else {
        let d = if a <= 0.25 {
            ((16.0 * a - 12.0) * a + 4.0) * a
        } else {
            a.sqrt()
        };
        a + (2.0 * b - 1.0) * (d - a)
    }
}

fn color_dodge(a: f32, b: f32) -> f32 {
    if a == 0.0 {
        0.0
    } else if b >= 1.0 {
        1.0
    } else {
        (a / (1.0 - b)).min(1.0)
    }
}

fn color_burn(a: f32, b: f32) -> f32 {
    if a >= 1.0 {
        1.0
    } else if b <= 0.0 {
        0.0
    } else {
        1.0 - ((1.0 - a) / b).min(1.0)
    }
}

fn vivid_light(a: f32, b: f32) -> f32 {
    if b < 0.5 {
        color_burn(a, 2.0 * b)
    } else {
        color_dodge(a, 2.0 * (b - 0.5))
    }
}

fn reflect(a: f32, b: f32) -> f32 {
    if b >= 1.0 {
        1.0
    } else {
        (a * a / (1.0 - b)).min(1.0)
    }
}

fn lum(c: Vec3) -> f32 {
    c.dot(Vec3::new(0.3, 0.59, 0.11))
}

fn clip_color(c: Vec3) -> Vec3 {
    let l = lum(c);
    let n = c.x.min(c.y).min(c.z);
    let x = c.x.max(c.y).max(c.z);
    let mut c = c;
    if n < 0.0 {
        c = Vec3::splat(l) + (c - Vec3::splat(l)) * l / (l - n);
    }
    if x > 1.0 {
        c = Vec3::splat(l) + (c - Vec3::splat(l)) * (1.0 - l) / (x - l);
    }
    c
}

fn set_lum(c: Vec3, l: f32) -> Vec3 {
    clip_color(c + Vec3::splat(l - lum(c)))
}

fn sat(c: Vec3) -> f32 {
    c.x.max(c.y).max(c.z) - c.x.min(c.y).min(c.z)
}

/// Rescales `c` so its channel range is `s`, keeping the middle channel's
/// relative position. Grey inputs become black.
fn set_sat(c: Vec3, s: f32) -> Vec3 {
    let hi = c.x.max(c.y).max(c.z);
    let lo = c.x.min(c.y).min(c.z);
    if hi > lo {
        (c - Vec3::splat(lo)) * s / (hi - lo)
    } else {
        Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(r: f32, g: f32, b: f32) -> Vec4 {
        Vec4::new(r, g, b, 1.0)
    }

    fn approx(a: Vec4, b: Vec4) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn ids_are_contiguous() {
        for (i, mode) in MixMode::ALL.iter().enumerate() {
            assert_eq!(mode.id(), i as i32);
            assert_eq!(MixMode::from_id(i as i32), Some(*mode));
        }
        assert_eq!(MixMode::from_id(27), None);
        assert_eq!(MixMode::from_id(-1), None);
        assert_eq!(MixMode::try_from(26), Ok(MixMode::Luminosity));
        assert_eq!(MixMode::default(), MixMode::Multiply);
    }

    #[test]
    fn keeps_base_alpha() {
        let base = Vec4::new(0.5, 0.5, 0.5, 0.25);
        let layer = Vec4::new(1.0, 0.0, 1.0, 1.0);
        for mode in MixMode::ALL {
            assert_eq!(mode.mix(base, layer).w, 0.25, "{mode:?}");
        }
    }

    #[test]
    fn simple_separable_modes() {
        let a = rgb(0.5, 0.2, 1.0);
        let b = rgb(0.5, 0.6, 0.0);
        assert!(approx(MixMode::Multiply.mix(a, b), rgb(0.25, 0.12, 0.0)));
        assert!(approx(MixMode::Add.mix(a, b), rgb(1.0, 0.8, 1.0)));
        assert!(approx(MixMode::Subtract.mix(a, b), rgb(0.0, 0.0, 1.0)));
        assert!(approx(MixMode::Screen.mix(a, b), rgb(0.75, 0.68, 1.0)));
        assert!(approx(MixMode::Difference.mix(a, b), rgb(0.0, 0.4, 1.0)));
        assert!(approx(MixMode::Darken.mix(a, b), rgb(0.5, 0.2, 0.0)));
        assert!(approx(MixMode::Lighten.mix(a, b), rgb(0.5, 0.6, 1.0)));
    }

    #[test]
    fn divide_by_zero_saturates() {
        let out = MixMode::Divide.mix(rgb(0.3, 0.0, 0.2), rgb(0.0, 0.0, 0.4));
        assert!(approx(out, rgb(1.0, 1.0, 0.5)));
    }

    #[test]
    fn neutral_layers() {
        let base = rgb(0.2, 0.4, 0.8);
        // White is neutral for multiply, black for screen and add.
        assert!(approx(MixMode::Multiply.mix(base, Vec4::ONE), base));
        assert!(approx(MixMode::Screen.mix(base, rgb(0.0, 0.0, 0.0)), base));
        assert!(approx(MixMode::LinearDodge.mix(base, rgb(0.0, 0.0, 0.0)), base));
        // Mid grey is neutral for the light modes.
        let grey = rgb(0.5, 0.5, 0.5);
        for mode in [MixMode::SoftLight, MixMode::LinearLight, MixMode::VividLight] {
            assert!(approx(mode.mix(base, grey), base), "{mode:?}");
        }
    }

    #[test]
    fn overlay_is_hard_light_swapped() {
        let a = rgb(0.2, 0.7, 0.5);
        let b = rgb(0.9, 0.1, 0.4);
        assert!(approx(MixMode::Overlay.mix(a, b), MixMode::HardLight.mix(b, a)));
    }

    #[test]
    fn hard_mix_is_binary() {
        let out = MixMode::HardMix.mix(rgb(0.2, 0.7, 0.5), rgb(0.1, 0.9, 0.6));
        for c in out.xyz().to_array() {
            assert!(c == 0.0 || c == 1.0);
        }
    }

    #[test]
    fn luminosity_takes_layer_brightness() {
        let base = rgb(1.0, 0.0, 0.0);
        let layer = rgb(0.5, 0.5, 0.5);
        let out = MixMode::Luminosity.mix(base, layer);
        assert!((lum(out.xyz()) - 0.5).abs() < 1e-5);
        // Still red.
        assert!(out.x > out.y && out.y == out.z);
    }

    #[test]
    fn color_of_grey_base_is_layer_hue_at_base_brightness() {
        let base = rgb(0.5, 0.5, 0.5);
        let out = MixMode::Color.mix(base, rgb(0.0, 0.0, 1.0));
        assert!((lum(out.xyz()) - 0.5).abs() < 1e-5);
        assert!(out.z > out.x);
    }

    #[test]
    fn saturation_of_grey_layer_desaturates() {
        let out = MixMode::Saturation.mix(rgb(0.8, 0.2, 0.4), rgb(0.3, 0.3, 0.3));
        assert!((out.x - out.y).abs() < 1e-5 && (out.y - out.z).abs() < 1e-5);
    }
}
