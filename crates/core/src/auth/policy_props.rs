//! Property-based tests for the access policy.

use proptest::prelude::*;
use uuid::Uuid;

use super::{AccessError, AccessPolicy, CallerContext, ResourceScope, Role, TerminationOperation};

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

fn arb_operation() -> impl Strategy<Value = TerminationOperation> {
    prop_oneof![
        Just(TerminationOperation::Create),
        Just(TerminationOperation::AccountantApprove),
        Just(TerminationOperation::OwnerApprove),
        Just(TerminationOperation::Complete),
        Just(TerminationOperation::Reject),
        Just(TerminationOperation::View),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A scoped caller whose assignment set misses the property is always denied.
    #[test]
    fn prop_unassigned_scoped_caller_denied(
        role in prop_oneof![Just(Role::Accountant), Just(Role::PropertyAdmin)],
        op in arb_operation(),
        property_id in arb_uuid(),
        tenant_id in arb_uuid(),
        assigned in prop::collection::vec(arb_uuid(), 0..5),
    ) {
        prop_assume!(!assigned.contains(&property_id));
        let caller = CallerContext::new(Uuid::new_v4(), role).with_assignments(assigned);
        let scope = ResourceScope { property_id, tenant_id };

        prop_assert!(AccessPolicy::authorize(&caller, op, &scope).is_err());
    }

    /// Roles off the allow-list are denied no matter the scope.
    #[test]
    fn prop_allow_list_is_respected(
        role in arb_role(),
        op in arb_operation(),
        property_id in arb_uuid(),
        tenant_id in arb_uuid(),
    ) {
        let caller = CallerContext::new(Uuid::new_v4(), role)
            .with_assignments([property_id])
            .with_tenant(Some(tenant_id));
        let scope = ResourceScope { property_id, tenant_id };
        let result = AccessPolicy::authorize(&caller, op, &scope);

        if op.allowed_roles().contains(&role) {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result, Err(AccessError::RoleNotAllowed { role, operation: op }));
        }
    }
}
