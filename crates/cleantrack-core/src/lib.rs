//! Simulation core for CleanTrack.
//!
//! - [`world`] -- [`WorldState`]: bins, trucks, hotspots, derived stats
//! - [`seed`] -- the default starting world
//! - [`simulator`] -- seedable random-walk tick
//! - [`query`] -- nearest available bin and citizen report submission
//! - [`broadcast`] -- subscriber registry with per-connection FIFO queues
//! - [`live`] -- [`LiveWorld`], the single-writer handle tying them together
//! - [`runner`] -- fixed-interval tick loop
//! - [`config`] -- typed YAML configuration
//!
//! # Architecture
//!
//! ```text
//! timer --> Simulator --> WorldState --> Broadcaster --> subscribers
//!                             ^
//! HTTP ---> query ------------+
//! ```
//!
//! All mutation goes through [`LiveWorld`], so the tick loop and request
//! handlers never observe a half-updated world.

pub mod broadcast;
pub mod config;
pub mod live;
pub mod query;
pub mod runner;
pub mod seed;
pub mod simulator;
pub mod world;

pub use broadcast::{Broadcaster, Subscription};
pub use config::CleanTrackConfig;
pub use live::{LiveWorld, ReportReceipt};
pub use simulator::{Simulator, TickSummary};
pub use world::WorldState;
