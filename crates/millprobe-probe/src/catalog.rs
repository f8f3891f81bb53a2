//! Probe operation catalog
//!
//! The catalog is the read-only registry of every supported probing cycle.
//! Each [`OperationType`] carries the G code of its cycle and an ordered map
//! of its settings; the declaration order is the order in which the
//! settings are written into the generated command.
//!
//! The standard catalog is built on first use and never changes afterwards,
//! so it can be read from any thread without locking.

use crate::setting::{SettingDescriptor, SettingOption, SettingSpec};
use indexmap::IndexMap;
use millprobe_core::ProbeError;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::Arc;

/// Setting keys shared by several operations
pub mod keys {
    pub const QUICK: &str = "quick";
    pub const OVERTRAVEL: &str = "overtravel";
    pub const SURFACE_CLEARANCE: &str = "surface_clearance";
    pub const EDGE_CLEARANCE: &str = "edge_clearance";
    pub const CORNER_CLEARANCE: &str = "corner_clearance";
    pub const DIAMETER: &str = "diameter";
    pub const DEPTH: &str = "depth";
    pub const WIDTH: &str = "width";
    pub const LENGTH: &str = "length";
    pub const AXIS: &str = "axis";
    pub const CORNER: &str = "corner";
    pub const SURFACE: &str = "surface";
    pub const DISTANCE: &str = "distance";
}

/// A probing cycle and the settings it accepts
#[derive(Debug, Clone, Serialize)]
pub struct OperationType {
    /// Catalog key
    pub key: String,
    /// Display name
    pub name: String,
    /// Display icon
    pub icon: String,
    /// Help text
    pub description: String,
    /// G code of the cycle, e.g. `6500.1`
    pub code: f64,
    /// Settings in emission order
    pub settings: IndexMap<String, Arc<SettingDescriptor>>,
}

impl OperationType {
    /// Create an operation without settings
    pub fn new(key: &str, name: &str, icon: &str, description: &str, code: f64) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
            code,
            settings: IndexMap::new(),
        }
    }

    /// Append a setting, sharing the descriptor
    pub fn with_setting(mut self, key: &str, descriptor: &Arc<SettingDescriptor>) -> Self {
        self.settings.insert(key.to_string(), Arc::clone(descriptor));
        self
    }

    /// Get a setting descriptor by key
    pub fn setting(&self, key: &str) -> Option<&Arc<SettingDescriptor>> {
        self.settings.get(key)
    }
}

/// Registry of probe operations
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    operations: IndexMap<String, OperationType>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation, keyed by its `key`
    pub fn add(&mut self, operation: OperationType) {
        self.operations.insert(operation.key.clone(), operation);
    }

    /// Look up an operation by key
    pub fn get(&self, key: &str) -> Result<&OperationType, ProbeError> {
        self.operations
            .get(key)
            .ok_or_else(|| ProbeError::CatalogLookupFailure {
                key: key.to_string(),
            })
    }

    /// Look up an operation by its G code
    pub fn by_code(&self, code: f64) -> Option<&OperationType> {
        self.operations.values().find(|op| op.code == code)
    }

    /// All operations in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &OperationType> {
        self.operations.values()
    }

    /// All operation keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Build the standard catalog of probing cycles
    pub fn standard() -> Self {
        let shared = SharedSettings::new();
        let mut catalog = Self::new();

        catalog.add(
            OperationType::new(
                "bore",
                "Bore",
                "mdi-circle-outline",
                "Finds the center of a circular bore (negative feature) by probing its inner diameter.",
                6500.1,
            )
            .with_setting(keys::DIAMETER, &diameter("The approximate diameter of the bore."))
            .with_setting(keys::DEPTH, &shared.depth)
            .with_setting(keys::OVERTRAVEL, &shared.overtravel),
        );

        catalog.add(
            OperationType::new(
                "boss",
                "Boss",
                "mdi-circle",
                "Finds the center of a circular boss (positive feature or workpiece) by probing its outer diameter.",
                6501.1,
            )
            .with_setting(keys::DIAMETER, &diameter("The approximate diameter of the boss."))
            .with_setting(keys::DEPTH, &shared.depth)
            .with_setting(keys::SURFACE_CLEARANCE, &shared.surface_clearance)
            .with_setting(keys::OVERTRAVEL, &shared.overtravel),
        );

        catalog.add(
            OperationType::new(
                "rectangle_pocket",
                "Rectangle Pocket",
                "mdi-rectangle-outline",
                "Finds the center of a rectangular pocket (negative feature) by probing its inner surfaces.",
                6502.1,
            )
            .with_setting(keys::WIDTH, &rectangle_width("pocket"))
            .with_setting(keys::LENGTH, &rectangle_length("pocket"))
            .with_setting(keys::DEPTH, &shared.depth)
            .with_setting(keys::SURFACE_CLEARANCE, &shared.surface_clearance)
            .with_setting(keys::CORNER_CLEARANCE, &shared.corner_clearance)
            .with_setting(keys::OVERTRAVEL, &shared.overtravel),
        );

        catalog.add(
            OperationType::new(
                "rectangle_block",
                "Rectangle Block",
                "mdi-rectangle",
                "Finds the center of a rectangular block (positive feature or workpiece) by probing its outer surfaces.",
                6503.1,
            )
            .with_setting(keys::WIDTH, &rectangle_width("block"))
            .with_setting(keys::LENGTH, &rectangle_length("block"))
            .with_setting(keys::DEPTH, &shared.depth)
            .with_setting(keys::SURFACE_CLEARANCE, &shared.surface_clearance)
            .with_setting(keys::CORNER_CLEARANCE, &shared.corner_clearance)
            .with_setting(keys::OVERTRAVEL, &shared.overtravel),
        );

        catalog.add(
            OperationType::new(
                "web",
                "Web",
                "mdi-math-norm-box",
                "Finds the center of a web (positive rectangular feature) on one axis by probing its outer surfaces.",
                6504.1,
            )
            .with_setting(keys::QUICK, &shared.quick)
            .with_setting(keys::AXIS, &axis("The axis of the web."))
            .with_setting(
                keys::WIDTH,
                &single_axis_width(
                    "The approximate width of the web. This is how far outwards along the probed axis we will move before probing back towards the web surfaces.",
                ),
            )
            .with_setting(keys::LENGTH, &single_axis_length("web"))
            .with_setting(keys::DEPTH, &shared.depth)
            .with_setting(keys::SURFACE_CLEARANCE, &shared.surface_clearance)
            .with_setting(keys::EDGE_CLEARANCE, &shared.edge_clearance)
            .with_setting(keys::OVERTRAVEL, &shared.overtravel),
        );

        catalog.add(
            OperationType::new(
                "pocket",
                "Pocket",
                "mdi-math-norm",
                "Finds the center of a pocket (negative rectangular feature) on one axis by probing its inner surfaces.",
                6505.1,
            )
            .with_setting(keys::QUICK, &shared.quick)
            .with_setting(keys::AXIS, &axis("The axis of the pocket."))
            .with_setting(
                keys::WIDTH,
                &single_axis_width(
                    "The approximate width of the pocket. This defines how far outwards we expect the probed surfaces to be from the start point, minus the clearance distance.",
                ),
            )
            .with_setting(keys::LENGTH, &single_axis_length("pocket"))
            .with_setting(keys::DEPTH, &shared.depth)
            .with_setting(keys::SURFACE_CLEARANCE, &shared.surface_clearance)
            .with_setting(keys::EDGE_CLEARANCE, &shared.edge_clearance)
            .with_setting(keys::OVERTRAVEL, &shared.overtravel),
        );

        // Outside corners default to the full (non-quick) cycle
        let thorough = Arc::new(SettingDescriptor {
            spec: SettingSpec::Boolean { default: false },
            ..(*shared.quick).clone()
        });
        let corner = corner_selection();
        let corner_width = corner_surface_length(
            "Width",
            "The approximate length of the X surface of the corner.",
            'H',
            "mdi-unfold-more-vertical",
        );
        let corner_length = corner_surface_length(
            "Length",
            "The approximate length of the Y surface of the corner.",
            'I',
            "mdi-unfold-more-horizontal",
        );

        catalog.add(
            OperationType::new(
                "outside_corner",
                "Outside Corner",
                "mdi-square-rounded-badge",
                "Finds the corner of a positive feature or workpiece by probing its outer surfaces.",
                6508.1,
            )
            .with_setting(keys::QUICK, &thorough)
            .with_setting(keys::CORNER, &corner)
            .with_setting(keys::WIDTH, &corner_width)
            .with_setting(keys::LENGTH, &corner_length)
            .with_setting(keys::DEPTH, &shared.depth)
            .with_setting(keys::SURFACE_CLEARANCE, &shared.surface_clearance)
            .with_setting(keys::CORNER_CLEARANCE, &shared.corner_clearance)
            .with_setting(keys::OVERTRAVEL, &shared.overtravel),
        );

        catalog.add(
            OperationType::new(
                "vise_corner",
                "Vise Corner",
                "mdi-cube",
                "Finds the top and corner of a positive feature or workpiece by probing its top and outer surfaces.",
                6520.1,
            )
            .with_setting(keys::QUICK, &shared.quick)
            .with_setting(keys::CORNER, &corner)
            .with_setting(keys::WIDTH, &corner_width)
            .with_setting(keys::LENGTH, &corner_length)
            .with_setting(
                keys::DEPTH,
                &Arc::new(
                    SettingDescriptor::number(
                        "Depth (from top surface)",
                        "How far to move down from the top surface of the corner before probing the sides.",
                        5.0,
                    )
                    .parameter('P')
                    .icon("mdi-arrow-down-bold-circle")
                    .range(0.0, 20.0)
                    .step(0.1)
                    .unit("mm"),
                ),
            )
            .with_setting(keys::SURFACE_CLEARANCE, &shared.surface_clearance)
            .with_setting(keys::CORNER_CLEARANCE, &shared.corner_clearance)
            .with_setting(keys::OVERTRAVEL, &shared.overtravel),
        );

        catalog.add(
            OperationType::new(
                "single_surface",
                "Single Surface",
                "mdi-square-opacity",
                "Finds the co-ordinate of a surface at one point.",
                6510.1,
            )
            .with_setting(keys::SURFACE, &surface_selection())
            .with_setting(
                keys::DISTANCE,
                &Arc::new(
                    SettingDescriptor::number(
                        "Distance",
                        "The approximate distance to move towards the target surface.",
                        10.0,
                    )
                    .parameter('I')
                    .icon("mdi-ruler")
                    .range(1.0, 100.0)
                    .step(0.1)
                    .unit("mm"),
                ),
            )
            .with_setting(keys::OVERTRAVEL, &shared.overtravel),
        );

        catalog
    }
}

static STANDARD_CATALOG: Lazy<Catalog> = Lazy::new(|| {
    let catalog = Catalog::standard();
    tracing::debug!("Probe catalog loaded with {} operations", catalog.len());
    catalog
});

/// Get the standard catalog
pub fn catalog() -> &'static Catalog {
    &STANDARD_CATALOG
}

/// Look up an operation in the standard catalog
pub fn lookup(key: &str) -> Result<&'static OperationType, ProbeError> {
    catalog().get(key)
}

/// Descriptors reused verbatim by several operations
struct SharedSettings {
    quick: Arc<SettingDescriptor>,
    overtravel: Arc<SettingDescriptor>,
    surface_clearance: Arc<SettingDescriptor>,
    corner_clearance: Arc<SettingDescriptor>,
    edge_clearance: Arc<SettingDescriptor>,
    depth: Arc<SettingDescriptor>,
}

impl SharedSettings {
    fn new() -> Self {
        Self {
            quick: Arc::new(
                SettingDescriptor::boolean(
                    "Quick Mode",
                    "If enabled, only a single probe point will be performed on each surface. Angle calculations will not be performed. Turn this off for more accurate probe results.",
                    true,
                )
                .parameter('Q')
                .icon("mdi-clock-fast"),
            ),
            overtravel: Arc::new(
                SettingDescriptor::number(
                    "Overtravel",
                    "The distance the probe will travel past the expected edge of the feature or workpiece, to account for inaccuracies in the starting position or feature dimensions.",
                    2.0,
                )
                .parameter('O')
                .icon("mdi-unfold-less-vertical")
                .range(1.0, 20.0)
                .step(0.1)
                .unit("mm"),
            ),
            surface_clearance: Arc::new(
                SettingDescriptor::number(
                    "Surface Clearance",
                    "The distance the probe will move inwards towards the expected surface of the feature or workpiece, to account for inaccuracies in the starting position or work holding.",
                    10.0,
                )
                .parameter('T')
                .icon("mdi-unfold-more-vertical")
                .range(2.0, 50.0)
                .step(0.1)
                .unit("mm"),
            ),
            corner_clearance: Arc::new(
                SettingDescriptor::number(
                    "Corner Clearance",
                    "The distance the probe will move inwards from the expected corner of the feature or workpiece, to account for inaccuracies in the starting position or corner radiuses.",
                    5.0,
                )
                .parameter('C')
                .icon("mdi-unfold-more-horizontal")
                .range(1.0, 50.0)
                .step(0.1)
                .unit("mm"),
            ),
            edge_clearance: Arc::new(
                SettingDescriptor::number(
                    "Edge Clearance",
                    "The distance the probe will move inwards from the expected edge of the feature or workpiece, to account for inaccuracies in the starting position.",
                    5.0,
                )
                .parameter('C')
                .icon("mdi-unfold-more-horizontal")
                .range(1.0, 50.0)
                .step(0.1)
                .unit("mm")
                .condition(keys::QUICK, false),
            ),
            depth: Arc::new(
                SettingDescriptor::number(
                    "Depth (from starting position)",
                    "How far to move down from the starting position before probing.",
                    5.0,
                )
                .parameter('Z')
                .icon("mdi-arrow-down-bold-circle")
                .range(0.0, 20.0)
                .multiplier(-1.0)
                .step(0.1)
                .unit("mm"),
            ),
        }
    }
}

fn diameter(description: &str) -> Arc<SettingDescriptor> {
    Arc::new(
        SettingDescriptor::number("Diameter", description, 10.0)
            .parameter('H')
            .icon("mdi-diameter-variant")
            .range(1.0, 100.0)
            .step(0.1)
            .unit("mm"),
    )
}

fn rectangle_width(feature: &str) -> Arc<SettingDescriptor> {
    Arc::new(
        SettingDescriptor::number(
            "Width (on X axis)",
            &format!(
                "The approximate width of the {} (measured parallel to the X axis).",
                feature
            ),
            10.0,
        )
        .parameter('H')
        .icon("mdi-unfold-more-vertical")
        .range(0.0, 300.0)
        .step(0.1)
        .unit("mm"),
    )
}

fn rectangle_length(feature: &str) -> Arc<SettingDescriptor> {
    Arc::new(
        SettingDescriptor::number(
            "Length (on Y axis)",
            &format!(
                "The approximate length of the {} (measured parallel to the Y axis).",
                feature
            ),
            10.0,
        )
        .parameter('I')
        .icon("mdi-unfold-more-horizontal")
        .range(0.0, 300.0)
        .step(0.1)
        .unit("mm"),
    )
}

fn single_axis_width(description: &str) -> Arc<SettingDescriptor> {
    Arc::new(
        SettingDescriptor::number("Width", description, 10.0)
            .parameter('H')
            .icon("mdi-unfold-less-vertical")
            .range(0.0, 300.0)
            .step(0.1)
            .unit("mm"),
    )
}

fn single_axis_length(feature: &str) -> Arc<SettingDescriptor> {
    Arc::new(
        SettingDescriptor::number(
            "Length",
            &format!(
                "The approximate length of the {0} surfaces. With quick mode disabled, this is used to calculate the probe locations on the {0} surfaces.",
                feature
            ),
            10.0,
        )
        .parameter('I')
        .icon("mdi-unfold-less-horizontal")
        .range(0.0, 300.0)
        .step(0.1)
        .unit("mm")
        .condition(keys::QUICK, false),
    )
}

fn corner_surface_length(
    label: &str,
    description: &str,
    parameter: char,
    icon: &str,
) -> Arc<SettingDescriptor> {
    Arc::new(
        SettingDescriptor::number(label, description, 10.0)
            .parameter(parameter)
            .icon(icon)
            .range(0.0, 300.0)
            .step(0.1)
            .unit("mm")
            .condition(keys::QUICK, false),
    )
}

fn axis(description: &str) -> Arc<SettingDescriptor> {
    Arc::new(
        SettingDescriptor::enumeration(
            "Axis",
            description,
            0,
            vec![
                SettingOption::new("mdi-swap-horizontal", "X"),
                SettingOption::new("mdi-swap-vertical", "Y"),
            ],
        )
        .parameter('N')
        .icon("mdi-axis-arrow"),
    )
}

fn corner_selection() -> Arc<SettingDescriptor> {
    Arc::new(
        SettingDescriptor::enumeration(
            "Corner",
            "The corner of the workpiece.",
            0,
            vec![
                SettingOption::new("mdi-arrow-bottom-left-bold-box", "Front Left"),
                SettingOption::new("mdi-arrow-bottom-right-bold-box", "Front Right"),
                SettingOption::new("mdi-arrow-top-right-bold-box", "Back Right"),
                SettingOption::new("mdi-arrow-top-left-bold-box", "Back Left"),
            ],
        )
        .parameter('N')
        .icon("mdi-rounded-corner"),
    )
}

fn surface_selection() -> Arc<SettingDescriptor> {
    Arc::new(
        SettingDescriptor::enumeration(
            "Surface",
            "The surface to probe towards.",
            0,
            vec![
                SettingOption::new("mdi-arrow-left-bold", "Left"),
                SettingOption::new("mdi-arrow-right-bold", "Right"),
                SettingOption::new("mdi-arrow-down-bold", "Front"),
                SettingOption::new("mdi-arrow-up-bold", "Back"),
                SettingOption::new("mdi-circle-box", "Top"),
            ],
        )
        .parameter('H')
        .icon("mdi-square-opacity"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setting::SettingValue;
    use std::collections::HashSet;

    #[test]
    fn test_standard_catalog_contents() {
        let keys: Vec<_> = catalog().keys().collect();
        assert_eq!(
            keys,
            vec![
                "bore",
                "boss",
                "rectangle_pocket",
                "rectangle_block",
                "web",
                "pocket",
                "outside_corner",
                "vise_corner",
                "single_surface",
            ]
        );
    }

    #[test]
    fn test_codes_are_unique() {
        let mut seen = HashSet::new();
        for op in catalog().iter() {
            assert!(seen.insert(op.code.to_bits()), "duplicate code {}", op.code);
        }
    }

    #[test]
    fn test_conditions_reference_existing_settings() {
        for op in catalog().iter() {
            for (key, descriptor) in &op.settings {
                if let Some(condition) = &descriptor.condition {
                    assert!(
                        op.settings.contains_key(&condition.setting),
                        "{}.{} depends on missing {}",
                        op.key,
                        key,
                        condition.setting
                    );
                }
            }
        }
    }

    #[test]
    fn test_lookup_unknown_key() {
        let err = lookup("nonexistent").unwrap_err();
        assert_eq!(
            err,
            ProbeError::CatalogLookupFailure {
                key: "nonexistent".to_string()
            }
        );
    }

    #[test]
    fn test_lookup_by_code() {
        let op = catalog().by_code(6504.1).unwrap();
        assert_eq!(op.key, "web");
        assert!(catalog().by_code(1.0).is_none());
    }

    #[test]
    fn test_overtravel_is_shared() {
        let bore = lookup("bore").unwrap();
        let web = lookup("web").unwrap();
        assert!(Arc::ptr_eq(
            bore.setting(keys::OVERTRAVEL).unwrap(),
            web.setting(keys::OVERTRAVEL).unwrap()
        ));
    }

    #[test]
    fn test_outside_corner_quick_override_is_a_copy() {
        let web = lookup("web").unwrap();
        let corner = lookup("outside_corner").unwrap();
        let shared = web.setting(keys::QUICK).unwrap();
        let overridden = corner.setting(keys::QUICK).unwrap();

        assert!(!Arc::ptr_eq(shared, overridden));
        assert_eq!(shared.default_value(), SettingValue::Boolean(true));
        assert_eq!(overridden.default_value(), SettingValue::Boolean(false));
        assert_eq!(shared.parameter, overridden.parameter);
    }

    #[test]
    fn test_bore_settings_order() {
        let bore = lookup("bore").unwrap();
        let keys: Vec<_> = bore.settings.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["diameter", "depth", "overtravel"]);
        assert_eq!(bore.code, 6500.1);
    }

    #[test]
    fn test_operation_serializes_for_display() {
        let json = serde_json::to_value(lookup("bore").unwrap()).unwrap();
        assert_eq!(json["code"], 6500.1);
        let depth = &json["settings"]["depth"];
        assert_eq!(depth["kind"], "number");
        assert_eq!(depth["parameter"], "Z");
        assert_eq!(depth["multiplier"], -1.0);
        assert_eq!(depth["default"], 5.0);

        let json = serde_json::to_value(lookup("web").unwrap()).unwrap();
        let length = &json["settings"]["length"];
        assert_eq!(length["condition"]["setting"], "quick");
        assert_eq!(length["condition"]["value"], false);
    }
}
