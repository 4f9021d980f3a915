//! Coupon administration handlers
//!
//! Redemption itself happens inside CreateOrder; these actions cover the
//! admin surface that mints and retires codes.

use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::validator::transitions::ensure_admin;
use shared::models::{Coupon, CouponKind, EntityKind};
use shared::util::now_millis;
use shared::{AppError, AppResult, ErrorCode, EventType, LifecycleEvent};

/// CreateCoupon action
#[derive(Debug, Clone)]
pub struct CreateCouponAction {
    pub code: String,
    pub kind: CouponKind,
    pub value: i64,
    pub usage_limit: u32,
    pub expires_at: i64,
}

impl CommandHandler for CreateCouponAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_admin(meta.role, "CREATE_COUPON")?;

        let exists = ctx.coupons()?.iter().any(|c| c.code == self.code);
        if exists {
            return Err(AppError::conflict(
                ErrorCode::CouponCodeExists,
                format!("Coupon code {} already exists", self.code),
            ));
        }

        let coupon = Coupon {
            code: self.code.clone(),
            kind: self.kind,
            value: self.value,
            usage_limit: self.usage_limit,
            used_count: 0,
            expires_at: self.expires_at,
            active: true,
            created_at: now_millis(),
        };

        let event = LifecycleEvent::created(
            EventType::CouponCreated,
            EntityKind::Coupon,
            coupon.code.clone(),
            "ACTIVE",
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_coupon(coupon)?;
        Ok(vec![event])
    }
}

/// DeactivateCoupon action
#[derive(Debug, Clone)]
pub struct DeactivateCouponAction {
    pub code: String,
}

impl CommandHandler for DeactivateCouponAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        meta: &CommandMetadata,
    ) -> AppResult<Vec<LifecycleEvent>> {
        ensure_admin(meta.role, "DEACTIVATE_COUPON")?;
        let mut coupon = ctx.coupon(&self.code)?;

        if !coupon.active {
            return Err(AppError::conflict(
                ErrorCode::CouponInactive,
                format!("Coupon {} is already inactive", coupon.code),
            ));
        }

        coupon.active = false;

        let event = LifecycleEvent::transition(
            EventType::CouponDeactivated,
            EntityKind::Coupon,
            coupon.code.clone(),
            "ACTIVE",
            "INACTIVE",
            meta.actor_id.clone(),
            meta.command_id.clone(),
        );
        ctx.put_coupon(coupon)?;
        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::store::LedgerStore;
    use shared::Role;

    fn test_meta(actor: &str, role: Role) -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor_id: actor.to_string(),
            role,
            timestamp: 1_700_000_000_000,
        }
    }

    fn create_coupon(ctx: &mut CommandContext<'_>, code: &str) -> AppResult<Coupon> {
        CreateCouponAction {
            code: code.to_string(),
            kind: CouponKind::Percentage,
            value: 10,
            usage_limit: 100,
            expires_at: i64::MAX,
        }
        .execute(ctx, &test_meta("admin-1", Role::Admin))?;
        ctx.coupon(code)
    }

    #[test]
    fn test_create_coupon_starts_active_and_unused() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let coupon = create_coupon(&mut ctx, "SAVE10").unwrap();
        assert!(coupon.active);
        assert_eq!(coupon.used_count, 0);
    }

    #[test]
    fn test_duplicate_code_conflicts() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        create_coupon(&mut ctx, "SAVE10").unwrap();
        let err = create_coupon(&mut ctx, "SAVE10").unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponCodeExists);
    }

    #[test]
    fn test_deactivate_twice_conflicts() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);
        let admin = test_meta("admin-1", Role::Admin);

        create_coupon(&mut ctx, "SAVE10").unwrap();
        DeactivateCouponAction {
            code: "SAVE10".to_string(),
        }
        .execute(&mut ctx, &admin)
        .unwrap();
        assert!(!ctx.coupon("SAVE10").unwrap().active);

        let err = DeactivateCouponAction {
            code: "SAVE10".to_string(),
        }
        .execute(&mut ctx, &admin)
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponInactive);
    }

    #[test]
    fn test_coupon_admin_requires_admin_role() {
        let store = LedgerStore::open_in_memory().unwrap();
        let config = EngineConfig::default();
        let mut ctx = CommandContext::new(&store, &config);

        let err = CreateCouponAction {
            code: "SAVE10".to_string(),
            kind: CouponKind::Amount,
            value: 5_000,
            usage_limit: 10,
            expires_at: i64::MAX,
        }
        .execute(&mut ctx, &test_meta("seller-1", Role::Seller))
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
    }
}
