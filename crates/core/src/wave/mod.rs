//! Cubic bezier approximation of a sine wave.
//!
//! Each quarter of a sine period is fit by two cubic curves using the classic
//! control-point ratios below, so one half-wave (lobe) takes four curves. The
//! curve lives in a normalised 1×1 box with its baseline at `y = 1`.

use std::{f64::consts::PI, fmt};

const SQRT_2: f64 = std::f64::consts::SQRT_2;
const Y1: f64 = 2.0 * SQRT_2 / 7.0 - 1.0 / 7.0;
const Y2: f64 = 4.0 * SQRT_2 / 7.0 - 2.0 / 7.0;
const Y3: f64 = SQRT_2 / 2.0;
const Y4: f64 = 3.0 * SQRT_2 / 7.0 + 2.0 / 7.0;

/// Vertical position of the resting line.
pub const BASELINE_Y: f64 = 1.0;

/// Total width of the generated wave.
pub const WIDTH: f64 = 1.0;

/// Cubic curves emitted per half-wave.
pub const CURVES_PER_LOBE: usize = 4;

/// Control-point heights of one lobe, as fractions of the lobe amplitude.
/// Three points per cubic, twelve horizontal steps per lobe.
const LOBE_PROFILE: [[f64; 3]; CURVES_PER_LOBE] = [
    [Y1, Y2, Y3],
    [Y4, 1.0, 1.0],
    [1.0, Y4, Y3],
    [Y2, Y1, 0.0],
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One `C` command: two control points and the end point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicCurve {
    pub fn points(&self) -> [Point; 3] {
        [self.control1, self.control2, self.end]
    }
}

/// A move command followed by a run of cubic curves.
///
/// `Display` produces SVG path data (`M 0 1 C x, y x, y x, y ...`).
#[derive(Debug, Clone, PartialEq)]
pub struct PathDescription {
    start: Point,
    curves: Vec<CubicCurve>,
}

impl PathDescription {
    pub fn curves(&self) -> &[CubicCurve] {
        &self.curves
    }

    /// Number of half-waves in the path.
    pub fn lobes(&self) -> usize {
        self.curves.len() / CURVES_PER_LOBE
    }

    /// Every point of the path, the move target included.
    pub fn control_points(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.start).chain(self.curves.iter().flat_map(|curve| curve.points()))
    }

    /// The extremum of lobe `index`, found at its horizontal midpoint.
    pub fn lobe_peak(&self, index: usize) -> Option<Point> {
        self.curves
            .get(index * CURVES_PER_LOBE + 1)
            .map(|curve| curve.end)
    }

    /// `true` when every point sits on the baseline.
    pub fn is_flat(&self) -> bool {
        self.control_points().all(|point| point.y == BASELINE_Y)
    }
}

impl fmt::Display for PathDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M {} {}", self.start.x, self.start.y)?;
        for curve in &self.curves {
            write!(
                f,
                " C {}, {} {}, {} {}, {}",
                curve.control1.x,
                curve.control1.y,
                curve.control2.x,
                curve.control2.y,
                curve.end.x,
                curve.end.y,
            )?;
        }
        Ok(())
    }
}

/// Builds the wave for the given peak amplitude.
///
/// The first lobe bulges upward (towards `1 - amplitude`) and the sign flips
/// on every following lobe. An amplitude of zero yields the flat baseline.
/// `num_half_waves == 0` yields a bare move command; callers are expected to
/// pass a validated count.
pub fn generate(amplitude: f64, num_half_waves: u32) -> PathDescription {
    let lobes = num_half_waves as usize;
    let n = f64::from(num_half_waves);
    // Horizontal step: π/12 scaled by width / (n·π), i.e. a twelfth of a lobe.
    // Computed in this form, with a running `x`, so the path data is stable
    // to the last printed digit.
    let xd = (PI / 12.0) * (WIDTH / (n * PI));

    let mut curves = Vec::with_capacity(lobes * CURVES_PER_LOBE);
    let mut amp = -amplitude;
    let mut x = 0.0;

    for _ in 0..lobes {
        let mut step = 0.0;
        for ratios in LOBE_PROFILE {
            let [control1, control2, end] = ratios.map(|ratio| {
                step += 1.0;
                Point::new(x + step * xd, BASELINE_Y + amp * ratio)
            });
            curves.push(CubicCurve {
                control1,
                control2,
                end,
            });
        }
        x += WIDTH / n;
        amp = -amp;
    }

    PathDescription {
        start: Point::new(0.0, BASELINE_Y),
        curves,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn zero_amplitude_is_flat() {
        for n in 1..=8 {
            let path = generate(0.0, n);
            assert!(path.is_flat(), "n = {n}");
            assert_eq!(path.lobes(), n as usize);
        }
    }

    #[test]
    fn lobe_peaks_alternate_around_baseline() {
        let amp = 0.3;
        let path = generate(amp, 4);

        for lobe in 0..4 {
            let peak = path.lobe_peak(lobe).unwrap();
            let expected = if lobe % 2 == 0 { 1.0 - amp } else { 1.0 + amp };
            assert!((peak.y - expected).abs() < EPS, "lobe {lobe}: {}", peak.y);
            assert!((peak.x - (lobe as f64 + 0.5) / 4.0).abs() < EPS);
        }
        assert!(path.lobe_peak(4).is_none());
    }

    #[test]
    fn stays_within_amplitude_band() {
        let amp = 0.45;
        let path = generate(amp, 3);
        for point in path.control_points() {
            assert!(point.y >= 1.0 - amp - EPS && point.y <= 1.0 + amp + EPS);
            assert!((0.0..=1.0 + EPS).contains(&point.x));
        }
    }

    #[test]
    fn lobes_join_on_the_baseline() {
        let path = generate(0.2, 5);
        let ends: Vec<Point> = path
            .curves()
            .chunks(CURVES_PER_LOBE)
            .map(|lobe| lobe[CURVES_PER_LOBE - 1].end)
            .collect();

        for (i, end) in ends.iter().enumerate() {
            assert_eq!(end.y, BASELINE_Y);
            assert!((end.x - (i + 1) as f64 / 5.0).abs() < EPS);
        }
    }

    #[test]
    fn x_coordinates_follow_running_lobe_offset() {
        for n in 1..=9_u32 {
            let path = generate(0.25, n);
            let xd = (PI / 12.0) * (1.0 / (f64::from(n) * PI));
            let mut x = 0.0;
            for lobe in path.curves().chunks(CURVES_PER_LOBE) {
                let xs: Vec<f64> = lobe
                    .iter()
                    .flat_map(|curve| curve.points())
                    .map(|point| point.x)
                    .collect();
                for (k, actual) in xs.iter().enumerate() {
                    let expected = x + (k + 1) as f64 * xd;
                    assert_eq!(actual.to_bits(), expected.to_bits(), "n = {n}, step {k}");
                }
                x += 1.0 / f64::from(n);
            }
        }
    }

    #[test]
    fn renders_svg_path_data() {
        let path = generate(0.0, 1);
        let d = path.to_string();
        assert!(d.starts_with("M 0 1 C "));
        assert_eq!(d.matches(" C ").count(), 4);
        assert!(d.ends_with(", 1"));
    }

    #[test]
    fn zero_half_waves_is_a_bare_move() {
        let path = generate(0.3, 0);
        assert_eq!(path.curves().len(), 0);
        assert_eq!(path.to_string(), "M 0 1");
    }
}
