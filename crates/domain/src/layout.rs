//! Accessory layout: how switches are grouped for the protocol layer.
//!
//! Installations upgraded from older releases expect both switches inside
//! the primary accessory, second slot first. A detached input on either
//! switch overrides that and forces one accessory per switch.

use crate::id::{AccessoryId, SwitchId};
use crate::switch::{SvcType, SwitchConfig};

/// Accessory id of the bridge's primary accessory.
pub const PRIMARY_AID: AccessoryId = AccessoryId::new(0x1);

const AID_BASE_SWITCH: u64 = 0x100;
const AID_BASE_OUTLET: u64 = 0x200;
const AID_BASE_LOCK: u64 = 0x300;

/// A switch placed inside an accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub slot: SwitchId,
    /// The switch's service is attached to the primary accessory.
    pub to_primary: bool,
}

/// One accessory and the switches it exposes, in exposure order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryPlan {
    pub aid: AccessoryId,
    pub placements: Vec<Placement>,
}

/// Result of layout planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    /// The legacy combined layout was selected.
    pub legacy: bool,
    pub accessories: Vec<AccessoryPlan>,
}

impl LayoutPlan {
    /// Plan the accessories for `switches`, given in slot order.
    ///
    /// Switches whose service type is [`SvcType::None`] are not placed.
    #[must_use]
    pub fn plan(legacy_layout: bool, switches: &[(SwitchId, &SwitchConfig)]) -> Self {
        let legacy = legacy_layout && !switches.iter().any(|(_, cfg)| cfg.in_mode.is_detached());
        let exposed = switches
            .iter()
            .filter(|(_, cfg)| cfg.svc_type != SvcType::None);

        let accessories = if legacy {
            let placements: Vec<_> = exposed
                .rev()
                .map(|(slot, _)| Placement {
                    slot: *slot,
                    to_primary: true,
                })
                .collect();
            if placements.is_empty() {
                Vec::new()
            } else {
                vec![AccessoryPlan {
                    aid: PRIMARY_AID,
                    placements,
                }]
            }
        } else {
            exposed
                .map(|(slot, cfg)| AccessoryPlan {
                    aid: accessory_id(cfg.svc_type, *slot),
                    placements: vec![Placement {
                        slot: *slot,
                        to_primary: false,
                    }],
                })
                .collect()
        };

        Self {
            legacy,
            accessories,
        }
    }

    /// Exposed switches in exposure order, across all accessories.
    #[must_use]
    pub fn exposure_order(&self) -> Vec<SwitchId> {
        self.accessories
            .iter()
            .flat_map(|acc| acc.placements.iter().map(|p| p.slot))
            .collect()
    }

    /// Placement of the given switch, if it is exposed.
    #[must_use]
    pub fn placement(&self, slot: SwitchId) -> Option<Placement> {
        self.accessories
            .iter()
            .flat_map(|acc| acc.placements.iter())
            .find(|p| p.slot == slot)
            .copied()
    }
}

/// Accessory id of a standalone switch accessory.
#[must_use]
pub fn accessory_id(svc_type: SvcType, slot: SwitchId) -> AccessoryId {
    let base = match svc_type {
        SvcType::Outlet => AID_BASE_OUTLET,
        SvcType::Lock => AID_BASE_LOCK,
        SvcType::Switch | SvcType::None => AID_BASE_SWITCH,
    };
    AccessoryId::new(base + u64::from(slot.get()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::switch::InMode;

    fn sw(in_mode: InMode) -> SwitchConfig {
        SwitchConfig::builder().in_mode(in_mode).build().unwrap()
    }

    const S1: SwitchId = SwitchId::new(1);
    const S2: SwitchId = SwitchId::new(2);

    #[test]
    fn should_combine_in_reverse_order_when_legacy() {
        let (a, b) = (sw(InMode::Momentary), sw(InMode::Toggle));
        let plan = LayoutPlan::plan(true, &[(S1, &a), (S2, &b)]);
        assert!(plan.legacy);
        assert_eq!(plan.accessories.len(), 1);
        assert_eq!(plan.accessories[0].aid, PRIMARY_AID);
        assert_eq!(plan.exposure_order(), vec![S2, S1]);
        assert!(plan.placement(S1).unwrap().to_primary);
        assert!(plan.accessories[0].placements[0].to_primary);
    }

    #[test]
    fn should_keep_slot_order_when_not_legacy() {
        let (a, b) = (sw(InMode::Momentary), sw(InMode::Edge));
        let plan = LayoutPlan::plan(false, &[(S1, &a), (S2, &b)]);
        assert!(!plan.legacy);
        assert_eq!(plan.exposure_order(), vec![S1, S2]);
        assert_eq!(plan.accessories[0].aid, AccessoryId::new(0x101));
        assert_eq!(plan.accessories[1].aid, AccessoryId::new(0x102));
        assert!(!plan.placement(S1).unwrap().to_primary);
    }

    #[test]
    fn should_ignore_legacy_flag_when_either_switch_is_detached() {
        for (m1, m2) in [
            (InMode::Detached, InMode::Momentary),
            (InMode::Toggle, InMode::Detached),
        ] {
            let (a, b) = (sw(m1), sw(m2));
            let plan = LayoutPlan::plan(true, &[(S1, &a), (S2, &b)]);
            assert!(!plan.legacy);
            assert_eq!(plan.exposure_order(), vec![S1, S2]);
            assert_eq!(plan.accessories.len(), 2);
        }
    }

    #[test]
    fn should_use_service_specific_accessory_ids() {
        assert_eq!(accessory_id(SvcType::Outlet, S2), AccessoryId::new(0x202));
        assert_eq!(accessory_id(SvcType::Lock, S1), AccessoryId::new(0x301));
    }

    #[test]
    fn should_skip_unexposed_switches() {
        let a = SwitchConfig::builder().svc_type(SvcType::None).build().unwrap();
        let b = sw(InMode::Momentary);
        let plan = LayoutPlan::plan(false, &[(S1, &a), (S2, &b)]);
        assert_eq!(plan.exposure_order(), vec![S2]);
        assert!(plan.placement(S1).is_none());
    }
}
