//! Hcal Readout Geometry.
//!
//! A readout geometry is a bundle of per-section arrays that must stay in
//! numeric lockstep with the solid-geometry description of the detector.
//! Only a handful of physical constants are independent; layer thicknesses,
//! zero positions, and bar half-widths are all derived from them.

use crate::common::{ConfigError, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Relative tolerance used when checking derived lengths.
const LENGTH_TOLERANCE: f64 = 1e-9;

/// Hcal section, in the order the engine encodes it in the Hcal ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum HcalSection {
    /// Back Hcal, downstream of the Ecal.
    Back = 0,
    /// Side Hcal above the Ecal.
    Top = 1,
    /// Side Hcal below the Ecal.
    Bottom = 2,
    /// Side Hcal to the right of the Ecal.
    Right = 3,
    /// Side Hcal to the left of the Ecal.
    Left = 4,
}

impl HcalSection {
    /// All sections in index order.
    pub const ALL: [HcalSection; 5] = [
        HcalSection::Back,
        HcalSection::Top,
        HcalSection::Bottom,
        HcalSection::Right,
        HcalSection::Left,
    ];

    /// Index of this section in the per-section arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Transverse extent of the Ecal a side section wraps around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EcalAxis {
    /// Uses `ecal_dx`.
    X,
    /// Uses `ecal_dy`.
    Y,
}

/// How the half-width of a readout bar is derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidthRule {
    /// `num_strips * width_scint / 2`
    Back,
    /// `(num_layers[cross] * layer_thickness[cross] + ecal_extent) / 2`
    ///
    /// A side bar spans the Ecal plus the depth of the stack on the
    /// perpendicular side, so `cross` names that other section.
    Side {
        /// Section whose depth the bar spans.
        cross: usize,
        /// Which Ecal extent the bar spans.
        axis: EcalAxis,
    },
    /// `-num_strips * width_scint / 2` per layer, with the zero strip at the
    /// opposite sign.
    PerLayerBar,
}

/// Indexing of the strip arrays (`zero_strip`, `num_strips`, `half_total_width`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StripGranularity {
    /// One entry per section.
    PerSection,
    /// One entry per layer, concatenated across sections.
    PerLayer,
}

/// Readout geometry parameters for one detector build.
///
/// Serializes with the key names the engine reads. Construction metadata
/// (absorber thicknesses, width rules, compiled patterns) stays on the Rust
/// side and is only used for validation.
#[derive(Clone, Debug, Serialize)]
pub struct HcalReadoutGeometry {
    /// Variant identifier, e.g. `v12`.
    #[serde(skip)]
    name: String,

    /// Regular expressions identifying which detectors this geometry serves.
    detectors_valid: Vec<String>,

    #[serde(rename = "ThicknessScint")]
    thickness_scint: f64,

    #[serde(rename = "WidthScint")]
    width_scint: f64,

    /// Position of the first layer of each section.
    #[serde(rename = "ZeroLayer")]
    zero_layer: Vec<f64>,

    /// Position of the first strip.
    #[serde(rename = "ZeroStrip")]
    zero_strip: Vec<f64>,

    #[serde(rename = "LayerThickness")]
    layer_thickness: Vec<f64>,

    #[serde(rename = "NumLayers")]
    num_layers: Vec<u32>,

    #[serde(rename = "NumStrips")]
    num_strips: Vec<u32>,

    /// Half length of a readout bar.
    #[serde(rename = "HalfTotalWidth")]
    half_total_width: Vec<f64>,

    #[serde(rename = "EcalDx")]
    ecal_dx: f64,

    #[serde(rename = "EcalDy")]
    ecal_dy: f64,

    #[serde(rename = "NumSections")]
    num_sections: usize,

    verbose: i32,

    #[serde(skip)]
    air_thickness: f64,

    /// Absorber thickness of each section.
    #[serde(skip)]
    absorber_thickness: Vec<f64>,

    /// Half-width derivation rule of each section.
    #[serde(skip)]
    width_rules: Vec<WidthRule>,

    #[serde(skip)]
    strip_granularity: StripGranularity,

    #[serde(skip)]
    patterns: Vec<Regex>,
}

/// Thickness of one absorber + scintillator layer with an air gap on both sides.
pub fn layer_thickness(absorber: f64, scint: f64, air: f64) -> f64 {
    absorber + scint + 2.0 * air
}

impl HcalReadoutGeometry {
    /// Builds the v12 geometry.
    ///
    /// Five sections: the back Hcal plus four side Hcal stacks around the
    /// Ecal. The back section is measured from the far face of the side Hcal,
    /// the side sections from half the side Hcal depth.
    pub fn v12() -> Result<Self> {
        // Must align with the v12 detector description
        const AIR_THICKNESS: f64 = 2.0;
        const BACK_ABSORBER_THICKNESS: f64 = 25.0;
        const SIDE_ABSORBER_THICKNESS: f64 = 20.0;
        const SCINT_THICKNESS: f64 = 20.0;
        const SCINT_WIDTH: f64 = 50.0;
        const ECAL_FRONT_Z: f64 = 220.0;
        const HCAL_SIDE_DZ: f64 = 600.0;
        const HCAL_BACK_DX: f64 = 3100.0;
        const ECAL_DX: f64 = 800.0;
        const ECAL_DY: f64 = 600.0;
        const NUM_LAYERS: [u32; 5] = [100, 28, 28, 26, 26];
        const NUM_STRIPS: [u32; 5] = [62, 12, 12, 12, 12];

        let absorber_thickness: Vec<f64> = HcalSection::ALL
            .iter()
            .map(|section| match section {
                HcalSection::Back => BACK_ABSORBER_THICKNESS,
                _ => SIDE_ABSORBER_THICKNESS,
            })
            .collect();
        let zero_layer = HcalSection::ALL
            .iter()
            .map(|section| match section {
                HcalSection::Back => ECAL_FRONT_Z + HCAL_SIDE_DZ,
                _ => HCAL_SIDE_DZ / 2.0,
            })
            .collect();
        let zero_strip = HcalSection::ALL
            .iter()
            .map(|section| match section {
                HcalSection::Back => HCAL_BACK_DX / 2.0,
                _ => ECAL_FRONT_Z,
            })
            .collect();
        let width_rules = HcalSection::ALL
            .iter()
            .map(|section| match section {
                HcalSection::Back => WidthRule::Back,
                HcalSection::Top => WidthRule::Side {
                    cross: HcalSection::Right.index(),
                    axis: EcalAxis::X,
                },
                HcalSection::Bottom => WidthRule::Side {
                    cross: HcalSection::Left.index(),
                    axis: EcalAxis::X,
                },
                HcalSection::Right => WidthRule::Side {
                    cross: HcalSection::Top.index(),
                    axis: EcalAxis::Y,
                },
                HcalSection::Left => WidthRule::Side {
                    cross: HcalSection::Bottom.index(),
                    axis: EcalAxis::Y,
                },
            })
            .collect();

        Self::assemble(
            Self {
                name: "v12".to_string(),
                detectors_valid: Vec::new(),
                thickness_scint: SCINT_THICKNESS,
                width_scint: SCINT_WIDTH,
                zero_layer,
                zero_strip,
                layer_thickness: Vec::new(),
                num_layers: NUM_LAYERS.to_vec(),
                num_strips: NUM_STRIPS.to_vec(),
                half_total_width: Vec::new(),
                ecal_dx: ECAL_DX,
                ecal_dy: ECAL_DY,
                num_sections: HcalSection::ALL.len(),
                verbose: 0,
                air_thickness: AIR_THICKNESS,
                absorber_thickness,
                width_rules,
                strip_granularity: StripGranularity::PerSection,
                patterns: Vec::new(),
            },
            &[
                "ldmx-det-v12",
                "ldmx-det-v12[.].*",
                "ldmx-det-v9",
                "ldmx-det-v10",
                "ldmx-det-v11",
            ],
        )
    }

    /// Builds the test-beam prototype geometry.
    ///
    /// A single section with a front block of narrow layers followed by a back
    /// block of wide layers; strip counts are listed per layer.
    pub fn prototype() -> Result<Self> {
        // Must align with the prototype detector description
        const AIR_THICKNESS: f64 = 2.0;
        const ABSORBER_THICKNESS: f64 = 25.0;
        const SCINT_THICKNESS: f64 = 20.0;
        const SCINT_BAR_WIDTH: f64 = 50.0;
        const NUM_LAYERS_FRONT_VERTICAL: u32 = 4;
        const NUM_LAYERS_FRONT_HORIZONTAL: u32 = 5;
        const NUM_LAYERS_BACK_VERTICAL: u32 = 5;
        const NUM_LAYERS_BACK_HORIZONTAL: u32 = 5;
        const NUM_BARS_FRONT: u32 = 8;
        const NUM_BARS_BACK: u32 = 12;

        let num_layers_front = NUM_LAYERS_FRONT_VERTICAL + NUM_LAYERS_FRONT_HORIZONTAL;
        let num_layers_back = NUM_LAYERS_BACK_VERTICAL + NUM_LAYERS_BACK_HORIZONTAL;
        let num_layers = num_layers_front + num_layers_back;
        let thickness = layer_thickness(ABSORBER_THICKNESS, SCINT_THICKNESS, AIR_THICKNESS);
        let dz = num_layers as f64 * thickness;

        let num_strips: Vec<u32> = std::iter::repeat(NUM_BARS_FRONT)
            .take(num_layers_front as usize)
            .chain(std::iter::repeat(NUM_BARS_BACK).take(num_layers_back as usize))
            .collect();
        let zero_strip = num_strips
            .iter()
            .map(|&n| n as f64 * SCINT_BAR_WIDTH / 2.0)
            .collect();

        Self::assemble(
            Self {
                name: "prototype".to_string(),
                detectors_valid: Vec::new(),
                thickness_scint: SCINT_THICKNESS,
                width_scint: SCINT_BAR_WIDTH,
                // First scintillator plane, not the first absorber
                zero_layer: vec![-dz / 2.0 + AIR_THICKNESS + ABSORBER_THICKNESS],
                zero_strip,
                layer_thickness: Vec::new(),
                num_layers: vec![num_layers],
                num_strips,
                half_total_width: Vec::new(),
                ecal_dx: 0.0,
                ecal_dy: 0.0,
                num_sections: 1,
                verbose: 0,
                air_thickness: AIR_THICKNESS,
                absorber_thickness: vec![ABSORBER_THICKNESS],
                width_rules: vec![WidthRule::PerLayerBar],
                strip_granularity: StripGranularity::PerLayer,
                patterns: Vec::new(),
            },
            &["ldmx-hcal-prototype-v[0-9]+[.][0-9]+"],
        )
    }

    /// Fills in the derived arrays, attaches the patterns, and validates.
    fn assemble(mut geometry: Self, detectors_valid: &[&str]) -> Result<Self> {
        geometry.layer_thickness = geometry
            .absorber_thickness
            .iter()
            .map(|&absorber| layer_thickness(absorber, geometry.thickness_scint, geometry.air_thickness))
            .collect();
        geometry.check_rule_shape()?;
        geometry.half_total_width = geometry.derived_half_widths();
        geometry.detectors_valid = detectors_valid.iter().map(|p| p.to_string()).collect();
        geometry.patterns = compile_patterns(&geometry.detectors_valid)?;
        geometry.validate()?;

        debug!(
            "Built Hcal readout geometry '{}' with {} section(s)",
            geometry.name, geometry.num_sections
        );
        Ok(geometry)
    }

    /// Returns a copy with the engine-side verbosity set.
    pub fn with_verbose(mut self, verbose: i32) -> Self {
        self.verbose = verbose;
        self
    }

    /// Variant identifier, e.g. `v12`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Detector-name patterns this geometry claims.
    pub fn detectors_valid(&self) -> &[String] {
        &self.detectors_valid
    }

    pub fn thickness_scint(&self) -> f64 {
        self.thickness_scint
    }

    pub fn width_scint(&self) -> f64 {
        self.width_scint
    }

    pub fn zero_layer(&self) -> &[f64] {
        &self.zero_layer
    }

    pub fn zero_strip(&self) -> &[f64] {
        &self.zero_strip
    }

    pub fn layer_thickness(&self) -> &[f64] {
        &self.layer_thickness
    }

    pub fn num_layers(&self) -> &[u32] {
        &self.num_layers
    }

    pub fn num_strips(&self) -> &[u32] {
        &self.num_strips
    }

    pub fn half_total_width(&self) -> &[f64] {
        &self.half_total_width
    }

    pub fn ecal_dx(&self) -> f64 {
        self.ecal_dx
    }

    pub fn ecal_dy(&self) -> f64 {
        self.ecal_dy
    }

    pub fn num_sections(&self) -> usize {
        self.num_sections
    }

    pub fn verbose(&self) -> i32 {
        self.verbose
    }

    pub fn air_thickness(&self) -> f64 {
        self.air_thickness
    }

    pub fn absorber_thickness(&self) -> &[f64] {
        &self.absorber_thickness
    }

    pub fn width_rules(&self) -> &[WidthRule] {
        &self.width_rules
    }

    pub fn strip_granularity(&self) -> StripGranularity {
        self.strip_granularity
    }

    /// Does any of this geometry's patterns match the whole detector name?
    pub fn matches(&self, detector: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(detector))
    }

    /// Number of entries the strip arrays must have.
    pub fn expected_strip_entries(&self) -> usize {
        match self.strip_granularity {
            StripGranularity::PerSection => self.num_sections,
            StripGranularity::PerLayer => self.num_layers.iter().map(|&n| n as usize).sum(),
        }
    }

    /// Section owning each entry of the strip arrays.
    pub fn strip_sections(&self) -> Vec<usize> {
        match self.strip_granularity {
            StripGranularity::PerSection => (0..self.num_sections).collect(),
            StripGranularity::PerLayer => self
                .num_layers
                .iter()
                .enumerate()
                .flat_map(|(s, &n)| std::iter::repeat(s).take(n as usize))
                .collect(),
        }
    }

    /// Expected layer thickness of a section from its construction constants.
    fn derived_layer_thickness(&self, section: usize) -> f64 {
        layer_thickness(
            self.absorber_thickness[section],
            self.thickness_scint,
            self.air_thickness,
        )
    }

    /// Bar half-widths implied by the width rules.
    fn derived_half_widths(&self) -> Vec<f64> {
        self.strip_sections()
            .into_iter()
            .enumerate()
            .map(|(entry, section)| {
                let strips = self.num_strips[entry] as f64;
                match self.width_rules[section] {
                    WidthRule::Back => strips * self.width_scint / 2.0,
                    WidthRule::Side { cross, axis } => {
                        let extent = match axis {
                            EcalAxis::X => self.ecal_dx,
                            EcalAxis::Y => self.ecal_dy,
                        };
                        (self.num_layers[cross] as f64 * self.layer_thickness[cross] + extent) / 2.0
                    }
                    WidthRule::PerLayerBar => -strips * self.width_scint / 2.0,
                }
            })
            .collect()
    }

    /// Checks the array lengths and cross references that derivation relies on.
    fn check_rule_shape(&self) -> Result<()> {
        let per_section = [
            ("ZeroLayer", self.zero_layer.len()),
            ("LayerThickness", self.layer_thickness.len()),
            ("NumLayers", self.num_layers.len()),
            ("absorber thickness", self.absorber_thickness.len()),
            ("width rules", self.width_rules.len()),
        ];
        for (field, len) in per_section {
            if len != self.num_sections {
                return Err(self.malformed(format!(
                    "{field} has {len} entries but there are {} sections",
                    self.num_sections
                )));
            }
        }

        let expected = self.expected_strip_entries();
        let per_strip = [
            ("ZeroStrip", self.zero_strip.len()),
            ("NumStrips", self.num_strips.len()),
        ];
        for (field, len) in per_strip {
            if len != expected {
                return Err(self.malformed(format!(
                    "{field} has {len} entries but {expected} are required"
                )));
            }
        }

        for (section, rule) in self.width_rules.iter().enumerate() {
            if let WidthRule::Side { cross, .. } = rule {
                if *cross >= self.num_sections || *cross == section {
                    return Err(self.malformed(format!(
                        "section {section} references invalid cross section {cross}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Verifies every derivation rule of this geometry.
    pub fn validate(&self) -> Result<()> {
        self.check_rule_shape()?;

        if self.half_total_width.len() != self.expected_strip_entries() {
            return Err(self.malformed(format!(
                "HalfTotalWidth has {} entries but {} are required",
                self.half_total_width.len(),
                self.expected_strip_entries()
            )));
        }

        for section in 0..self.num_sections {
            let expected = self.derived_layer_thickness(section);
            if !approx_eq(self.layer_thickness[section], expected) {
                return Err(self.malformed(format!(
                    "layer thickness of section {section} is {} mm, expected {expected} mm",
                    self.layer_thickness[section]
                )));
            }
        }

        let sections = self.strip_sections();
        for (entry, expected) in self.derived_half_widths().into_iter().enumerate() {
            let actual = self.half_total_width[entry];
            if !approx_eq(actual, expected) {
                return Err(self.malformed(format!(
                    "half total width {entry} is {actual} mm, expected {expected} mm"
                )));
            }
            if self.width_rules[sections[entry]] == WidthRule::PerLayerBar
                && !approx_eq(self.zero_strip[entry], -actual)
            {
                return Err(self.malformed(format!(
                    "zero strip {entry} must mirror the half total width"
                )));
            }
        }
        Ok(())
    }

    fn malformed(&self, reason: String) -> ConfigError {
        ConfigError::MalformedGeometry {
            variant: self.name.clone(),
            reason,
        }
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    // The engine requires the whole detector name to match
    patterns
        .iter()
        .map(|p| Regex::new(&format!("^(?:{p})$")).map_err(ConfigError::from))
        .collect()
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= LENGTH_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

fn join<T: ToString>(values: &[T], sep: &str) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

impl fmt::Display for HcalReadoutGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "HcalReadoutGeometry {} {{ Scintillator thickness: {:.1} mm, width: {:.1} mm, and half total width (back Hcal): {:.1} mm",
            self.name,
            self.thickness_scint,
            self.width_scint,
            self.half_total_width.first().copied().unwrap_or_default()
        )?;
        writeln!(
            f,
            "Z positions of zero-th layer {} mm, Z positions of zero-th strip {} mm",
            join(&self.zero_layer, ","),
            join(&self.zero_strip, ",")
        )?;
        writeln!(f, "layer thickness {} mm", join(&self.layer_thickness, ","))?;
        writeln!(f, "ecal dx {:.1} dy {:.1} mm", self.ecal_dx, self.ecal_dy)?;
        write!(
            f,
            "nlayers {}, nstrips {} }}",
            join(&self.num_layers, " "),
            join(&self.num_strips, " ")
        )
    }
}
