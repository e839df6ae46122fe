//! Command menu engine for terminal applications
//!
//! This crate provides the state machine behind a searchable command menu:
//! - Fuzzy relevance scoring (`command_score`, or nucleo-matcher)
//! - An item/group registry with mount/unmount lifecycle
//! - A micro-batching scheduler that coalesces re-filter/re-sort work per tick
//! - A subscribable store holding the filtered, sorted state
//!
//! # Example
//!
//! ```rust
//! use command_menu::{CommandMenu, MenuOptions};
//!
//! let menu = CommandMenu::new(MenuOptions::default());
//! let ctx = menu.context();
//!
//! let _sub = menu.store().subscribe(|| println!("menu changed"));
//!
//! ctx.value("apple", "Apple", &[])?;
//! let apple = ctx.item("apple", Some("Fruit"))?;
//! ctx.value("banana", "Banana", &[])?;
//! let _banana = ctx.item("banana", Some("Fruit"))?;
//!
//! // End of tick: one filter + sort + emit for both items
//! menu.flush();
//! assert_eq!(menu.store().snapshot().selected.as_deref(), Some("apple"));
//!
//! ctx.set_search("ban")?;
//! menu.flush();
//! assert_eq!(menu.store().snapshot().filtered.order, vec!["banana"]);
//!
//! apple.unregister();
//! # Ok::<(), command_menu::CommandError>(())
//! ```

mod context;
mod error;
mod options;
mod provider;
mod registry;
mod scheduler;
mod score;
mod state;
mod store;

pub use context::{CommandContext, CommandMenu, KeyOutcome, MenuKey, Registration, Section};
pub use error::CommandError;
pub use options::MenuOptions;
pub use provider::{CommandItem, CommandProvider, Providers};
pub use registry::{ItemMeta, Registry};
pub use scheduler::{Batch, Priority, Scheduler};
pub use score::{CommandScore, Filter, NucleoFilter, command_score};
pub use state::{Field, Filtered, State};
pub use store::{Store, Subscription};
