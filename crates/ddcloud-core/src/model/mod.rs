// ── Domain model ──
//
// Types the resource works with after field values have been parsed.
// Wire shapes stay in `ddcloud-api`; `convert` maps between the two.

pub mod firewall;

pub use firewall::{FirewallAction, Placement, PlacementPosition, ScopeMatch, ScopeSide};
