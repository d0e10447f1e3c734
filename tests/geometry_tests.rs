//! Integration tests for the Hcal readout geometry.

use detsim_config::geometry::*;
use detsim_config::ConfigError;

fn v12() -> HcalReadoutGeometry {
    HcalReadoutGeometry::v12().unwrap()
}

fn prototype() -> HcalReadoutGeometry {
    HcalReadoutGeometry::prototype().unwrap()
}

/// Tests that every variant builds and passes its own validation.
#[test]
fn test_all_variants_validate() {
    let registry = HcalGeometry::new().unwrap();
    assert_eq!(registry.variants().len(), 2);
    for variant in registry.variants() {
        variant.validate().unwrap();
    }
}

/// Tests layer thickness against absorber + scintillator + two air gaps.
#[test]
fn test_layer_thickness_rule() {
    for geometry in [v12(), prototype()] {
        for s in 0..geometry.num_sections() {
            assert_eq!(
                geometry.layer_thickness()[s],
                geometry.absorber_thickness()[s] + geometry.thickness_scint() + 2.0 * geometry.air_thickness()
            );
        }
    }
    assert_eq!(v12().layer_thickness(), vec![49.0, 44.0, 44.0, 44.0, 44.0]);
    assert_eq!(prototype().layer_thickness(), vec![49.0]);
}

/// Tests that all v12 arrays have one entry per section.
#[test]
fn test_v12_array_lengths() {
    let g = v12();
    assert_eq!(g.num_sections(), 5);
    for len in [
        g.num_layers().len(),
        g.num_strips().len(),
        g.zero_layer().len(),
        g.zero_strip().len(),
        g.layer_thickness().len(),
        g.half_total_width().len(),
    ] {
        assert_eq!(len, g.num_sections());
    }
}

/// Tests the v12 zero positions of back and side sections.
#[test]
fn test_v12_zero_positions() {
    let g = v12();
    assert_eq!(g.zero_layer(), vec![820.0, 300.0, 300.0, 300.0, 300.0]);
    assert_eq!(g.zero_strip(), vec![1550.0, 220.0, 220.0, 220.0, 220.0]);
}

/// Tests the back section half-width and the side cross pairing.
#[test]
fn test_v12_half_total_width() {
    let g = v12();
    let back = HcalSection::Back.index();
    assert_eq!(
        g.half_total_width()[back],
        g.num_strips()[back] as f64 * g.width_scint() / 2.0
    );

    let pairs = [
        (HcalSection::Top, HcalSection::Right, g.ecal_dx()),
        (HcalSection::Bottom, HcalSection::Left, g.ecal_dx()),
        (HcalSection::Right, HcalSection::Top, g.ecal_dy()),
        (HcalSection::Left, HcalSection::Bottom, g.ecal_dy()),
    ];
    for (section, cross, extent) in pairs {
        let (s, c) = (section.index(), cross.index());
        assert_eq!(
            g.half_total_width()[s],
            (g.num_layers()[c] as f64 * g.layer_thickness()[c] + extent) / 2.0,
            "section {section:?}"
        );
    }
    assert_eq!(g.half_total_width(), vec![1550.0, 972.0, 972.0, 916.0, 916.0]);
}

/// Tests the prototype's per-layer strip arrays.
#[test]
fn test_prototype_per_layer_strips() {
    let g = prototype();
    assert_eq!(g.num_sections(), 1);
    assert_eq!(g.num_layers(), vec![19]);
    assert_eq!(g.strip_granularity(), StripGranularity::PerLayer);
    assert_eq!(g.expected_strip_entries(), 19);
    assert_eq!(g.num_strips().len(), 19);
    assert!(g.num_strips()[..9].iter().all(|&n| n == 8));
    assert!(g.num_strips()[9..].iter().all(|&n| n == 12));

    for i in 0..g.num_strips().len() {
        assert_eq!(g.zero_strip()[i], g.num_strips()[i] as f64 * 25.0);
        assert_eq!(g.half_total_width()[i], -g.zero_strip()[i]);
    }
}

/// Tests the prototype's first scintillator plane position.
#[test]
fn test_prototype_zero_layer() {
    // 19 layers of 49 mm centred on zero, then air and absorber
    assert_eq!(prototype().zero_layer(), vec![-438.5]);
}

/// Tests lookup of the v12 family and its older aliases.
#[test]
fn test_lookup_v12_detectors() {
    for name in ["ldmx-det-v12", "ldmx-det-v12.1", "ldmx-det-v9", "ldmx-det-v10", "ldmx-det-v11"] {
        assert_eq!(lookup_geometry(name).unwrap().name(), "v12", "{name}");
    }
}

/// Tests lookup of the prototype.
#[test]
fn test_lookup_prototype() {
    assert_eq!(lookup_geometry("ldmx-hcal-prototype-v1.0").unwrap().name(), "prototype");
}

/// Tests that patterns must match the whole detector name.
#[test]
fn test_lookup_no_match() {
    for name in ["ldmx-det-v13", "ldmx-det-v120", "xldmx-det-v12", ""] {
        assert!(
            matches!(lookup_geometry(name), Err(ConfigError::NoMatchingVariant { ref detector }) if detector == name),
            "{name}"
        );
    }
}

/// Tests that overlapping variants are reported instead of resolved by order.
#[test]
fn test_lookup_ambiguous() {
    let registry = HcalGeometry::from_variants(vec![v12(), prototype(), v12()]);

    match registry.lookup("ldmx-det-v12") {
        Err(ConfigError::AmbiguousVariant { variants, .. }) => {
            assert_eq!(variants, vec!["v12".to_string(), "v12".to_string()]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
    assert_eq!(registry.lookup("ldmx-hcal-prototype-v1.0").unwrap().name(), "prototype");
}

/// Tests lookup by variant name.
#[test]
fn test_registry_get() {
    let registry = HcalGeometry::new().unwrap();
    assert!(registry.get("v12").is_some());
    assert!(registry.get("prototype").is_some());
    assert!(registry.get("ldmx-det-v12").is_none());
}

/// Tests that the engine keys are used in the handoff.
#[test]
fn test_geometry_serialization_keys() {
    let json = serde_json::to_value(v12()).unwrap();
    assert_eq!(json["NumSections"], 5);
    assert_eq!(json["ThicknessScint"], 20.0);
    assert_eq!(json["HalfTotalWidth"][0], 1550.0);
    assert_eq!(json["NumLayers"][3], 26);
    assert_eq!(json["detectors_valid"][1], "ldmx-det-v12[.].*");
    assert!(json.get("absorber_thickness").is_none());
    assert!(json.get("name").is_none());
}

/// Tests the human-readable summary.
#[test]
fn test_geometry_display() {
    let text = v12().to_string();
    assert!(text.contains("half total width (back Hcal): 1550.0 mm"));
    assert!(text.contains("layer thickness 49,44,44,44,44 mm"));
    assert!(text.contains("nlayers 100 28 28 26 26, nstrips 62 12 12 12 12"));
}

/// Tests that the handed-off patterns are the ones lookup matches against.
#[test]
fn test_handoff_patterns_match_lookup() {
    for geometry in [v12(), prototype()] {
        let json = serde_json::to_value(&geometry).unwrap();
        let handed_off: Vec<&str> = json["detectors_valid"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p.as_str().unwrap())
            .collect();
        assert_eq!(handed_off, geometry.detectors_valid());
    }
    assert!(v12().matches("ldmx-det-v12.3"));
    assert!(!prototype().matches("ldmx-det-v12.3"));
}
