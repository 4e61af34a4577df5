//! API Regression Tests for the sens Crate Ecosystem
//!
//! These tests guard the public API across the sens crates. They are
//! organized in tiers of increasing scope:
//!
//! - Tier 1: Foundation (sens-types value types)
//! - Tier 2: Kernel contracts (sens-kernel in-memory kernel)
//! - Tier 3: Sensitivities (sens-engine end to end)
//!
//! If any of these tests fail after API changes, it indicates a breaking
//! change that needs a version bump.

// Allow test-specific patterns
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::float_cmp)]

use sens::{engine, kernel, prelude::*, types};

// =============================================================================
// TIER 1: Foundation - Value Types
// =============================================================================

mod tier1_foundation {
    use super::*;

    #[test]
    fn param_index_is_one_based() {
        assert!(ParamIndex::new(0).is_none());
        assert_eq!(ParamIndex::new(3).unwrap().get(), 3);
    }

    #[test]
    fn entity_signed_ids() {
        assert_eq!(EntityRef::Edge(4).signed_id(), -4);
        assert_eq!(EntityRef::Face(4).signed_id(), 4);
        assert_eq!(EntityRef::from_signed(-2), Some(EntityRef::Edge(2)));
        assert_eq!(EntityRef::from_signed(0), None);
    }

    #[test]
    fn global_index_offsets() {
        assert_eq!(GlobalIndex::new(1).unwrap().offset(), 0);
        assert_eq!(GlobalIndex::new(4).unwrap().offset(), 9);
    }

    #[test]
    fn sensitivity_vector_layout() {
        let mut v = SensitivityVector::zeros(2);
        assert_eq!(v.len(), 6);
        assert!(v.set(GlobalIndex::new(2).unwrap(), Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(v.as_slice(), &[0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
        assert!(!v.set(GlobalIndex::new(3).unwrap(), Vector3::zeros()));
    }

    #[test]
    fn severity_codes_and_tags() {
        assert_eq!(Severity::from_code(-1), Some(Severity::Continue));
        assert_eq!(Severity::from_code(3), Some(Severity::Status));
        assert_eq!(Severity::from_code(7), None);
        assert_eq!(Severity::Warning.tag(), "Warning:");
        assert_eq!(types::ObjectClass::Tessellation, types::ObjectClass::Tessellation);
    }

    #[test]
    fn lookup_sentinel_has_no_index() {
        assert_eq!(ParamLookup::NoSensitivity.index(), None);
        let idx = ParamIndex::new(2).unwrap();
        assert_eq!(ParamLookup::Index(idx).index(), Some(idx));
    }
}

// =============================================================================
// TIER 2: Kernel Contracts
// =============================================================================

mod tier2_kernel {
    use super::*;

    #[test]
    fn memory_model_parameter_table() {
        let mut model = MemoryModel::new();
        let p = model.add_design_parameter("span", ParamShape::new(1, 2), &[3.0, 4.0]);
        assert_eq!(model.param_count().unwrap(), 1);
        let info = model.param_info(p).unwrap();
        assert!(info.is_design());
        assert_eq!(model.param_value(p, 1, 2).unwrap(), 4.0);
    }

    #[test]
    fn out_level_handle_is_shared() {
        let model = MemoryModel::new();
        let handle = model.out_level();
        let previous = handle.set_level(0);
        assert_eq!(previous, 1);
        assert_eq!(model.out_level().level(), 0);
    }

    #[test]
    fn tessellation_numbering() {
        let tess = MemoryTess::new(
            MemoryBody::wire(),
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
        )
        .with_edge([2, 1]);
        let g = tess.local_to_global(EntityRef::Edge(1), 1).unwrap();
        assert_eq!(g.get(), 2);
        assert_eq!(tess.point_count(EntityRef::Edge(1)).unwrap(), 2);
    }

    #[test]
    fn build_depth_default_is_all() {
        assert_eq!(kernel::BuildDepth::default(), kernel::BuildDepth::All);
    }
}

// =============================================================================
// TIER 3: Sensitivities
// =============================================================================

mod tier3_sensitivity {
    use super::*;

    fn quad() -> (MemoryModel, MemoryTess) {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let body = MemoryBody::sheet(1).with_geometry(points.clone());
        let tess = MemoryTess::new(body.clone(), points).with_face([1, 2, 3, 4]);
        let mut model = MemoryModel::new();
        let p = model.add_design_parameter("p", ParamShape::scalar(), &[0.0]);
        let slot = model.add_body(BodyKind::Sheet, body);
        model.attach_tessellation(slot, tess.clone());
        model.set_derivative(
            p,
            1,
            1,
            slot,
            vec![
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
                Vector3::new(1.0, 1.0, 1.0),
            ],
        );
        (model, tess)
    }

    #[test]
    fn face_scenario() {
        let (mut model, tess) = quad();
        let dsen =
            tess_sensitivity(&mut model, "p", Some(&tess), &SensitivityParams::default()).unwrap();
        assert_eq!(
            dsen.into_vec(),
            vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn error_kinds_are_distinguishable() {
        let (mut model, tess) = quad();
        let params = SensitivityParams::default();

        let err = tess_sensitivity::<_, MemoryTess>(&mut model, "p", None, &params).unwrap_err();
        assert!(matches!(err, SensitivityError::InvalidTessellation { .. }));

        let err = tess_sensitivity(&mut model, "nope", Some(&tess), &params).unwrap_err();
        assert!(matches!(err, SensitivityError::NoSensitivity { .. }));

        let err = tess_sensitivity(&mut model, "p", Some(&tess), &SensitivityParams::entry(1, 0))
            .unwrap_err();
        assert!(matches!(err, SensitivityError::InvalidColumn(0)));
    }

    #[test]
    fn lookup_and_listing() {
        let (model, _) = quad();
        let found = find_design_parameter(&model, "p", 1, 1).unwrap();
        assert!(found.index().is_some());
        let all = design_parameters(&model).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "p");
    }

    #[test]
    fn finite_difference_matches() {
        let (mut model, tess) = quad();
        let params = SensitivityParams::default();
        let analytic = tess_sensitivity(&mut model, "p", Some(&tess), &params).unwrap();
        let fd = finite_difference_sensitivity(&mut model, "p", Some(&tess), 1e-3, &params)
            .unwrap();
        for (a, f) in analytic.as_slice().iter().zip(fd.as_slice()) {
            approx::assert_relative_eq!(a, f, epsilon = 1e-9);
        }
    }

    #[test]
    fn parameter_values() {
        let (mut model, _) = quad();
        let p = find_design_parameter(&model, "p", 1, 1).unwrap().index().unwrap();
        engine::write_param_value(&mut model, p, &ParamValue::Scalar(0.5)).unwrap();
        assert_eq!(
            engine::read_param_value(&model, p).unwrap(),
            ParamValue::Scalar(0.5)
        );
    }

    #[test]
    fn error_report_format() {
        let errors = MemoryErrorList::new().with_record(
            Severity::Error,
            Some("body 1"),
            ["build failed", "at branch 3"],
        );
        let mut out = Vec::new();
        let printed = engine::report_errors_to(&mut out, Some(errors)).unwrap();
        assert_eq!(printed, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            " Error:   build failed\n          at branch 3\n"
        );
    }

    #[test]
    fn surface_at_new_values() {
        let (mut model, tess) = quad();
        let p = find_design_parameter(&model, "p", 1, 1).unwrap().index().unwrap();
        let xyz = surface_coordinates(
            &mut model,
            Some(&tess),
            1,
            &[(p, ParamValue::Scalar(2.0))],
            &SensitivityParams::default(),
        )
        .unwrap();
        assert_eq!(
            xyz,
            vec![2.0, 0.0, 0.0, 1.0, 2.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 2.0]
        );
    }

    #[test]
    fn coordinates_share_layout() {
        let (_, tess) = quad();
        let xyz = engine::tess_coordinates(&tess).unwrap();
        assert_eq!(xyz.len(), 12);
        assert_eq!(&xyz[6..9], &[1.0, 1.0, 0.0]);
    }
}
