/*!
 * Translation of JSON localization documents.
 *
 * This module is split into several submodules:
 *
 * - `port`: The boundary to whatever performs the actual translation
 * - `core`: `TranslationService`, the configured provider behind that boundary
 * - `leaf`: Translation of a single string value
 * - `walker`: Structure-preserving traversal of a JSON tree
 * - `document`: The document model and its run states
 * - `pipeline`: Load, translate and atomically persist one document
 * - `observer`: Per-leaf trace records
 * - `formatting`: Cleanup of provider output
 */

// Re-export main types for easier usage
pub use self::core::TranslationService;
pub use self::document::{Document, DocumentState};
pub use self::leaf::LeafTranslator;
pub use self::observer::{CollectingObserver, CompositeObserver, LogObserver, ProgressObserver, TraceObserver, TraceRecord};
pub use self::pipeline::{Completion, DocumentPipeline};
pub use self::port::{TranslationPort, TranslationRequest};
pub use self::walker::{FailurePolicy, LeafFailure, TreeWalker, WalkStats};

// Submodules
pub mod core;
pub mod document;
pub mod formatting;
pub mod leaf;
pub mod observer;
pub mod pipeline;
pub mod port;
pub mod walker;
