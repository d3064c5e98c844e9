//! Resizing a surface by prescribing three of its planform dimensions. Any three of aspect ratio,
//! span, area, root chord, tip chord and taper ratio fix a trapezoid, except for the two
//! dependent triples (aspect ratio, span, area) and (root chord, tip chord, taper ratio).

use crate::Result;
use crate::common::units::{in_meters, in_square_meters};
use crate::errors::GeometryError;
use uom::si::f64::{Area, Length};

/// The three dimensions a surface is resized to. Span and area refer to the whole surface, so
/// they include the mirrored half of a wing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdjustCriterion {
    AspectRatioSpanChordRoot { aspect_ratio: f64, span: Length, chord_root: Length },
    AspectRatioSpanChordTip { aspect_ratio: f64, span: Length, chord_tip: Length },
    AspectRatioSpanTaper { aspect_ratio: f64, span: Length, taper_ratio: f64 },
    AspectRatioAreaChordRoot { aspect_ratio: f64, area: Area, chord_root: Length },
    AspectRatioAreaChordTip { aspect_ratio: f64, area: Area, chord_tip: Length },
    AspectRatioAreaTaper { aspect_ratio: f64, area: Area, taper_ratio: f64 },
    AspectRatioChords { aspect_ratio: f64, chord_root: Length, chord_tip: Length },
    AspectRatioChordRootTaper { aspect_ratio: f64, chord_root: Length, taper_ratio: f64 },
    AspectRatioChordTipTaper { aspect_ratio: f64, chord_tip: Length, taper_ratio: f64 },
    SpanAreaChordRoot { span: Length, area: Area, chord_root: Length },
    SpanAreaChordTip { span: Length, area: Area, chord_tip: Length },
    SpanAreaTaper { span: Length, area: Area, taper_ratio: f64 },
    SpanChords { span: Length, chord_root: Length, chord_tip: Length },
    SpanChordRootTaper { span: Length, chord_root: Length, taper_ratio: f64 },
    SpanChordTipTaper { span: Length, chord_tip: Length, taper_ratio: f64 },
    AreaChords { area: Area, chord_root: Length, chord_tip: Length },
    AreaChordRootTaper { area: Area, chord_root: Length, taper_ratio: f64 },
    AreaChordTipTaper { area: Area, chord_tip: Length, taper_ratio: f64 },
}

/// A trapezoid in raw SI values, with span and area taken over the whole surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trapezoid {
    pub span: f64,
    pub area: f64,
    pub chord_root: f64,
    pub chord_tip: f64,
}

impl Trapezoid {
    pub fn aspect_ratio(&self) -> f64 {
        self.span * self.span / self.area
    }

    pub fn taper_ratio(&self) -> f64 {
        self.chord_tip / self.chord_root
    }

    /// The area and aspect ratio of the two-sided equivalent wing with this planform. A
    /// non-mirrored surface counts as one half of it.
    pub fn two_sided(&self, mirrored: bool) -> (f64, f64) {
        if mirrored {
            (self.area, self.aspect_ratio())
        } else {
            (2.0 * self.area, 2.0 * self.aspect_ratio())
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Known {
    aspect_ratio: Option<f64>,
    span: Option<f64>,
    area: Option<f64>,
    chord_root: Option<f64>,
    chord_tip: Option<f64>,
    taper_ratio: Option<f64>,
    mean_chord: Option<f64>,
}

impl AdjustCriterion {
    fn known(&self) -> Known {
        use AdjustCriterion::*;
        let m = |l: Length| Some(in_meters(l));
        let a = |s: Area| Some(in_square_meters(s));
        match *self {
            AspectRatioSpanChordRoot { aspect_ratio, span, chord_root } => Known {
                aspect_ratio: Some(aspect_ratio),
                span: m(span),
                chord_root: m(chord_root),
                ..Known::default()
            },
            AspectRatioSpanChordTip { aspect_ratio, span, chord_tip } => Known {
                aspect_ratio: Some(aspect_ratio),
                span: m(span),
                chord_tip: m(chord_tip),
                ..Known::default()
            },
            AspectRatioSpanTaper { aspect_ratio, span, taper_ratio } => Known {
                aspect_ratio: Some(aspect_ratio),
                span: m(span),
                taper_ratio: Some(taper_ratio),
                ..Known::default()
            },
            AspectRatioAreaChordRoot { aspect_ratio, area, chord_root } => Known {
                aspect_ratio: Some(aspect_ratio),
                area: a(area),
                chord_root: m(chord_root),
                ..Known::default()
            },
            AspectRatioAreaChordTip { aspect_ratio, area, chord_tip } => Known {
                aspect_ratio: Some(aspect_ratio),
                area: a(area),
                chord_tip: m(chord_tip),
                ..Known::default()
            },
            AspectRatioAreaTaper { aspect_ratio, area, taper_ratio } => Known {
                aspect_ratio: Some(aspect_ratio),
                area: a(area),
                taper_ratio: Some(taper_ratio),
                ..Known::default()
            },
            AspectRatioChords { aspect_ratio, chord_root, chord_tip } => Known {
                aspect_ratio: Some(aspect_ratio),
                chord_root: m(chord_root),
                chord_tip: m(chord_tip),
                ..Known::default()
            },
            AspectRatioChordRootTaper { aspect_ratio, chord_root, taper_ratio } => Known {
                aspect_ratio: Some(aspect_ratio),
                chord_root: m(chord_root),
                taper_ratio: Some(taper_ratio),
                ..Known::default()
            },
            AspectRatioChordTipTaper { aspect_ratio, chord_tip, taper_ratio } => Known {
                aspect_ratio: Some(aspect_ratio),
                chord_tip: m(chord_tip),
                taper_ratio: Some(taper_ratio),
                ..Known::default()
            },
            SpanAreaChordRoot { span, area, chord_root } => Known {
                span: m(span),
                area: a(area),
                chord_root: m(chord_root),
                ..Known::default()
            },
            SpanAreaChordTip { span, area, chord_tip } => Known {
                span: m(span),
                area: a(area),
                chord_tip: m(chord_tip),
                ..Known::default()
            },
            SpanAreaTaper { span, area, taper_ratio } => Known {
                span: m(span),
                area: a(area),
                taper_ratio: Some(taper_ratio),
                ..Known::default()
            },
            SpanChords { span, chord_root, chord_tip } => Known {
                span: m(span),
                chord_root: m(chord_root),
                chord_tip: m(chord_tip),
                ..Known::default()
            },
            SpanChordRootTaper { span, chord_root, taper_ratio } => Known {
                span: m(span),
                chord_root: m(chord_root),
                taper_ratio: Some(taper_ratio),
                ..Known::default()
            },
            SpanChordTipTaper { span, chord_tip, taper_ratio } => Known {
                span: m(span),
                chord_tip: m(chord_tip),
                taper_ratio: Some(taper_ratio),
                ..Known::default()
            },
            AreaChords { area, chord_root, chord_tip } => Known {
                area: a(area),
                chord_root: m(chord_root),
                chord_tip: m(chord_tip),
                ..Known::default()
            },
            AreaChordRootTaper { area, chord_root, taper_ratio } => Known {
                area: a(area),
                chord_root: m(chord_root),
                taper_ratio: Some(taper_ratio),
                ..Known::default()
            },
            AreaChordTipTaper { area, chord_tip, taper_ratio } => Known {
                area: a(area),
                chord_tip: m(chord_tip),
                taper_ratio: Some(taper_ratio),
                ..Known::default()
            },
        }
    }

    /// Solve for the full trapezoid described by the three prescribed dimensions.
    ///
    /// returns: Result<Trapezoid, GeometryError>
    pub fn resolve(&self) -> Result<Trapezoid> {
        let mut k = self.known();
        let given = [
            (k.aspect_ratio, "aspect ratio"),
            (k.span, "span"),
            (k.area, "area"),
            (k.chord_root, "root chord"),
            (k.chord_tip, "tip chord"),
            (k.taper_ratio, "taper ratio"),
        ];
        for (value, name) in given {
            if let Some(v) = value {
                check_positive(v, name)?;
            }
        }

        // Every criterion closes within three passes over the relations below
        for _ in 0..3 {
            k.span = k.span.or(k.aspect_ratio.zip(k.area).map(|(ar, s)| (s * ar).sqrt()));
            k.area = k.area.or(k.aspect_ratio.zip(k.span).map(|(ar, b)| b * b / ar));
            k.chord_tip = k.chord_tip.or(k.chord_root.zip(k.taper_ratio).map(|(cr, l)| l * cr));
            k.chord_root = k.chord_root.or(k.chord_tip.zip(k.taper_ratio).map(|(ct, l)| ct / l));

            k.mean_chord = k
                .mean_chord
                .or(k.area.zip(k.span).map(|(s, b)| s / b))
                .or(k.chord_root.zip(k.chord_tip).map(|(cr, ct)| 0.5 * (cr + ct)));
            if let Some(c) = k.mean_chord {
                k.span = k
                    .span
                    .or(k.aspect_ratio.map(|ar| ar * c))
                    .or(k.area.map(|s| s / c));
                k.area = k.area.or(k.span.map(|b| b * c));
                k.chord_root = k
                    .chord_root
                    .or(k.chord_tip.map(|ct| 2.0 * c - ct))
                    .or(k.taper_ratio.map(|l| 2.0 * c / (1.0 + l)));
                k.chord_tip = k.chord_tip.or(k.chord_root.map(|cr| 2.0 * c - cr));
            }
        }

        let (Some(span), Some(area), Some(chord_root), Some(chord_tip)) =
            (k.span, k.area, k.chord_root, k.chord_tip)
        else {
            return Err(GeometryError::degenerate(format!(
                "{self:?} does not determine a planform"
            )));
        };
        check_positive(chord_root, "resolved root chord")?;
        check_positive(chord_tip, "resolved tip chord")?;

        Ok(Trapezoid {
            span,
            area,
            chord_root,
            chord_tip,
        })
    }
}

fn check_positive(value: f64, name: &str) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::degenerate(format!(
            "{name} must be positive, got {value}"
        )))
    }
}
