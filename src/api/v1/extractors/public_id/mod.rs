/**
 * Responsibility
 *  - core (復号 + extractor 実装) と types (リソースごとの ID 型) を束ねる
 */
mod core;
mod types;

pub use types::*;
