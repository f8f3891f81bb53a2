use millprobe_probe::{
    catalog, compile, keys, lookup, SettingDescriptor, SettingSpec, SettingValue,
    SettingsSnapshot, SnapshotBuilder, ValueModifiers,
};
use proptest::prelude::*;
use std::sync::Arc;

/// Letters the snapshot would emit, in order, given its current values
fn expected_letters(snapshot: &SettingsSnapshot) -> Vec<char> {
    snapshot
        .iter()
        .filter(|s| snapshot.is_included(s))
        .filter_map(|s| s.descriptor().parameter)
        .collect()
}

fn emitted_letters(gcode: &str) -> Vec<char> {
    gcode
        .split(' ')
        .skip(1)
        .filter_map(|word| word.chars().next())
        .collect()
}

/// Snapshot of `operation` with every boolean set from `flags`
fn with_flags(operation: &str, flags: &[bool]) -> SettingsSnapshot {
    let op = lookup(operation).unwrap();
    let mut builder = SnapshotBuilder::from_operation(op);
    let booleans: Vec<_> = op
        .settings
        .iter()
        .filter(|(_, d)| matches!(d.spec, SettingSpec::Boolean { .. }))
        .map(|(k, _)| k.clone())
        .collect();
    for (key, flag) in booleans.iter().zip(flags.iter().cycle()) {
        builder.set(key, *flag).unwrap();
    }
    builder.build().unwrap()
}

fn operation_key() -> impl Strategy<Value = String> {
    let keys: Vec<String> = catalog().keys().map(String::from).collect();
    proptest::sample::select(keys)
}

proptest! {
    #[test]
    fn prop_token_order_matches_declaration_order(
        key in operation_key(),
        flags in proptest::collection::vec(any::<bool>(), 1..4),
    ) {
        let op = lookup(&key).unwrap();
        let snapshot = with_flags(&key, &flags);
        let gcode = compile(op.code, &snapshot, None);
        prop_assert_eq!(emitted_letters(&gcode), expected_letters(&snapshot));
    }

    #[test]
    fn prop_conditional_setting_present_iff_condition_holds(
        quick in any::<bool>(),
        length in 0.0f64..300.0,
    ) {
        for operation in ["web", "pocket", "outside_corner", "vise_corner"] {
            let op = lookup(operation).unwrap();
            let mut builder = SnapshotBuilder::from_operation(op);
            builder.set(keys::QUICK, quick).unwrap();
            builder.set(keys::LENGTH, length).unwrap();
            let gcode = compile(op.code, &builder.build().unwrap(), None);
            let has_length = gcode.split(' ').any(|w| w.starts_with('I'));
            prop_assert_eq!(has_length, !quick, "{}: {}", operation, gcode);
        }
    }

    #[test]
    fn prop_condition_on_either_boolean_value(required in any::<bool>(), actual in any::<bool>()) {
        let mut builder = SnapshotBuilder::new("custom");
        builder
            .add_setting(
                "toggle",
                Arc::new(SettingDescriptor::boolean("Toggle", "", false).parameter('Q')),
            )
            .add_setting(
                "height",
                Arc::new(
                    SettingDescriptor::number("Height", "", 3.0)
                        .parameter('H')
                        .condition("toggle", required),
                ),
            );
        builder.set("toggle", actual).unwrap();
        let gcode = compile(1.0, &builder.build().unwrap(), None);

        let toggle = if actual { "Q1" } else { "Q0" };
        let expected = if actual == required {
            format!("G1 {} H3", toggle)
        } else {
            format!("G1 {}", toggle)
        };
        prop_assert_eq!(gcode, expected);
    }

    #[test]
    fn prop_booleans_are_written_as_digits(quick in any::<bool>()) {
        let snapshot = with_flags("web", &[quick]);
        let gcode = compile(6504.1, &snapshot, None);
        let word = gcode.split(' ').find(|w| w.starts_with('Q')).unwrap();
        prop_assert_eq!(word, if quick { "Q1" } else { "Q0" });
        prop_assert!(!gcode.contains("true") && !gcode.contains("false"));
    }

    #[test]
    fn prop_modifier_arithmetic(
        depth in 0.0f64..20.0,
        offset in -500.0f64..500.0,
    ) {
        let op = lookup("bore").unwrap();
        let mut builder = SnapshotBuilder::from_operation(op);
        builder.set(keys::DEPTH, depth).unwrap();
        let snapshot = builder.build().unwrap();

        let plain = compile(op.code, &snapshot, None);
        let word = plain.split(' ').find(|w| w.starts_with('Z')).unwrap();
        prop_assert_eq!(word[1..].parse::<f64>().unwrap(), depth);

        let mods = ValueModifiers::new().with_offset('Z', offset);
        let modified = compile(op.code, &snapshot, Some(&mods));
        let word = modified.split(' ').find(|w| w.starts_with('Z')).unwrap();
        prop_assert_eq!(word[1..].parse::<f64>().unwrap(), depth * -1.0 + offset);
    }

    #[test]
    fn prop_compilation_is_idempotent(
        key in operation_key(),
        flags in proptest::collection::vec(any::<bool>(), 1..4),
        offset in -100.0f64..100.0,
    ) {
        let op = lookup(&key).unwrap();
        let snapshot = with_flags(&key, &flags);
        let mods = ValueModifiers::new().with_offset('Z', offset);
        prop_assert_eq!(
            compile(op.code, &snapshot, Some(&mods)),
            compile(op.code, &snapshot, Some(&mods))
        );
    }
}

#[test]
fn test_every_operation_compiles_with_defaults() {
    for op in catalog().iter() {
        let snapshot = SettingsSnapshot::defaults(op).unwrap();
        assert!(snapshot.check_bounds().is_ok(), "{} defaults out of bounds", op.key);
        let gcode = compile(op.code, &snapshot, None);
        assert!(gcode.starts_with(&format!("G{}", op.code)));
        assert!(!gcode.ends_with(' '));
        assert!(!gcode.contains("  "));
    }
}

#[test]
fn test_enum_values_are_indices() {
    let op = lookup("outside_corner").unwrap();
    let mut builder = SnapshotBuilder::from_operation(op);
    builder.set_text(keys::CORNER, "Back Left").unwrap();
    let snapshot = builder.build().unwrap();
    assert_eq!(snapshot.value(keys::CORNER), Some(SettingValue::Enum(3)));
    let gcode = compile(op.code, &snapshot, None);
    assert!(gcode.contains(" N3 "));
}
