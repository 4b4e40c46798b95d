use crate::core::constants::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Fury,
    ArcaneCharges,
    Momentum,
    Zeal,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Fury,
        ResourceType::ArcaneCharges,
        ResourceType::Momentum,
        ResourceType::Zeal,
    ];

    /// Stable key used by the snapshot (`resource-bar-<key>`).
    pub fn key(&self) -> &'static str {
        match self {
            ResourceType::Fury => "fury",
            ResourceType::ArcaneCharges => "arcane_charges",
            ResourceType::Momentum => "momentum",
            ResourceType::Zeal => "zeal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceType::Fury => "Fury",
            ResourceType::ArcaneCharges => "Arcane Charges",
            ResourceType::Momentum => "Momentum",
            ResourceType::Zeal => "Zeal",
        }
    }

    /// Generation rule: how much this resource gains from a combat event.
    pub fn gain_for(&self, event: ResourceEvent) -> u32 {
        match (self, event) {
            (ResourceType::Fury, ResourceEvent::HitDealt { .. }) => FURY_PER_HIT_DEALT,
            (ResourceType::Fury, ResourceEvent::HitTaken) => FURY_PER_HIT_TAKEN,
            (ResourceType::ArcaneCharges, ResourceEvent::CombatTick) => ARCANE_CHARGES_PER_TICK,
            (ResourceType::Momentum, ResourceEvent::HitDealt { crit }) => {
                if crit {
                    MOMENTUM_PER_HIT_DEALT + MOMENTUM_PER_CRIT
                } else {
                    MOMENTUM_PER_HIT_DEALT
                }
            }
            (ResourceType::Momentum, ResourceEvent::Dodged) => MOMENTUM_PER_DODGE,
            (ResourceType::Zeal, ResourceEvent::HitDealt { .. }) => ZEAL_PER_HIT_DEALT,
            (ResourceType::Zeal, ResourceEvent::HitTaken) => ZEAL_PER_HIT_TAKEN,
            _ => 0,
        }
    }
}

/// Combat occurrences that may generate resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceEvent {
    /// Player landed a hit
    HitDealt { crit: bool },
    /// Player took damage from a landed hit
    HitTaken,
    /// Player dodged an attack
    Dodged,
    /// One combat tick elapsed
    CombatTick,
}

/// The resource ledger for an active path. Always within `0..=max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResource {
    kind: ResourceType,
    current: u32,
    max: u32,
}

impl PathResource {
    pub fn new(kind: ResourceType) -> Self {
        Self {
            kind,
            current: 0,
            max: RESOURCE_CAP,
        }
    }

    pub fn kind(&self) -> ResourceType {
        self.kind
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }

    /// Deducts `cost` if affordable. Returns false and leaves the ledger
    /// untouched otherwise.
    pub fn try_spend(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current -= cost;
        true
    }

    /// Adds up to the cap. Returns the amount actually gained.
    pub fn gain(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current - before
    }

    pub fn on_event(&mut self, event: ResourceEvent) -> u32 {
        let amount = self.kind.gain_for(event);
        self.gain(amount)
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}
