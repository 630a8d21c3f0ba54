/// Normalize to the range (-PI, PI].
///
/// Uses the atan2 identity rather than remainder arithmetic so the result is
/// exact at the branch cut and safe for arbitrarily large inputs.
#[inline]
pub fn wrap_angle(x: f32) -> f32 {
    x.sin().atan2(x.cos())
}

/// Wrap every element of a phase buffer in place.
#[inline]
pub fn wrap_all(phases: &mut [f32]) {
    for p in phases.iter_mut() {
        *p = wrap_angle(*p);
    }
}

#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    wrap_angle(a - b)
}
