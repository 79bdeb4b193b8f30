//! Listener Slot Tests
//!
//! Tests for:
//! - Reference counting through the registry and typed handles
//! - Component suffix addressing
//! - Value marshalling for every listener type

use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

use kinema::animation::listener::{ListenerRegistry, parse_target};
use kinema::animation::{AnimListener, ListenerValue};
use kinema::core::KinemaError;

// ============================================================================
// Reference Counting
// ============================================================================

#[test]
fn balanced_acquire_release_empties_registry() {
    let mut registry = ListenerRegistry::new();
    for k in 1..=5 {
        for _ in 0..k {
            registry.acquire("slot", 4).unwrap();
        }
        assert_eq!(registry.use_count("slot"), Some(k));
        for _ in 0..k {
            registry.release("slot").unwrap();
        }
        assert!(registry.is_empty(), "registry not empty after {k} acquire/release pairs");
    }
}

#[test]
fn over_release_is_reported() {
    let mut registry = ListenerRegistry::new();
    registry.acquire("slot", 1).unwrap();
    registry.release("slot").unwrap();
    assert_eq!(
        registry.release("slot"),
        Err(KinemaError::UnknownListener("slot".to_string()))
    );
}

#[test]
fn slot_survives_until_last_handle_drops() {
    let registry = ListenerRegistry::shared();
    let a = AnimListener::<f32>::with_value(&registry, "x", 4.0).unwrap();
    let b = AnimListener::<f32>::new(&registry, "x").unwrap();

    // Re-acquiring does not reset the value.
    assert_eq!(b.value(), 4.0);

    drop(a);
    assert_eq!(registry.borrow().use_count("x"), Some(1));
    assert_eq!(b.value(), 4.0);
    drop(b);
    assert!(registry.borrow().is_empty());
}

#[test]
fn mismatched_handle_type_is_rejected() {
    let registry = ListenerRegistry::shared();
    let _position = AnimListener::<Vec3>::new(&registry, "p").unwrap();
    let err = AnimListener::<Vec4>::new(&registry, "p").unwrap_err();
    assert!(matches!(err, KinemaError::ComponentMismatch { existing: 3, requested: 4, .. }));
    assert_eq!(registry.borrow().use_count("p"), Some(1));
}

#[test]
fn handles_share_storage() {
    let registry = ListenerRegistry::shared();
    let writer = AnimListener::<Vec2>::new(&registry, "uv").unwrap();
    let reader = AnimListener::<Vec2>::new(&registry, "uv").unwrap();
    writer.set(Vec2::new(0.25, 0.75));
    assert_eq!(reader.value(), Vec2::new(0.25, 0.75));
    assert_eq!(registry.borrow().values_by_name("uv").unwrap(), &[0.25, 0.75]);
}

// ============================================================================
// Component Addressing
// ============================================================================

#[test]
fn suffix_selects_component_offset() {
    let mut registry = ListenerRegistry::new();
    registry.acquire("foo", 4).unwrap();

    let y = registry.acquire_with_offset("foo.Y", 1);
    assert!(!y.is_scratch());
    assert_eq!(y.offset(), 1);

    let q = registry.acquire_with_offset("foo.Q", 1);
    assert_eq!(q.offset(), 3);
    assert_eq!(q.slot_name(), Some("foo"));

    assert_eq!(registry.use_count("foo"), Some(3));
}

#[test]
fn every_alias_maps_to_its_component() {
    let cases = [
        ("X", 0), ("R", 0), ("S", 0), ("U", 0),
        ("Y", 1), ("G", 1), ("T", 1), ("V", 1),
        ("Z", 2), ("B", 2), ("P", 2),
        ("W", 3), ("A", 3), ("Q", 3),
    ];
    for (suffix, index) in cases {
        let target = format!("node/value.{suffix}");
        assert_eq!(parse_target(&target).unwrap(), ("node/value", index), "suffix {suffix}");
    }
}

#[test]
fn bad_suffix_and_overflow_are_not_bound() {
    let mut registry = ListenerRegistry::new();
    registry.acquire("vec", 3).unwrap();

    assert!(registry.acquire_with_offset("vec.W", 1).is_scratch());
    assert!(registry.acquire_with_offset("vec.x", 1).is_scratch());
    assert!(registry.acquire_with_offset("other", 1).is_scratch());
    assert_eq!(registry.use_count("vec"), Some(1));
}

#[test]
fn released_binding_no_longer_holds_slot() {
    let mut registry = ListenerRegistry::new();
    registry.acquire("foo", 2).unwrap();
    let mut binding = registry.acquire_with_offset("foo.V", 1);
    registry.release("foo").unwrap();
    assert_eq!(registry.use_count("foo"), Some(1));

    registry.release_binding(&mut binding).unwrap();
    assert!(registry.is_empty());
    // A detached binding absorbs writes.
    registry.write(&mut binding, 0, 1.0);
    assert!(registry.is_empty());
}

// ============================================================================
// Value Marshalling
// ============================================================================

fn round_trip<T: ListenerValue + PartialEq + std::fmt::Debug>(value: T) {
    let mut buffer = vec![0.0; T::COMPONENTS];
    value.write_to(&mut buffer);
    assert_eq!(T::read_from(&buffer), value);
}

#[test]
fn component_counts() {
    assert_eq!(f32::COMPONENTS, 1);
    assert_eq!(Vec2::COMPONENTS, 2);
    assert_eq!(Vec3::COMPONENTS, 3);
    assert_eq!(Vec4::COMPONENTS, 4);
    assert_eq!(Quat::COMPONENTS, 4);
    assert_eq!(Mat4::COMPONENTS, 16);
}

#[test]
fn values_survive_slot_storage() {
    round_trip(2.5_f32);
    round_trip(Vec3::new(1.0, -2.0, 3.0));
    round_trip(Quat::from_rotation_y(0.3));
    round_trip(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
}

#[test]
fn matrix_slots_are_column_major() {
    let m = Mat4::from_translation(Vec3::new(7.0, 8.0, 9.0));
    let mut buffer = [0.0; 16];
    m.write_to(&mut buffer);
    assert_eq!(&buffer[12..15], &[7.0, 8.0, 9.0]);
}
