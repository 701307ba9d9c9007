//! # Manifest Module
//!
//! A declarative way to feed the router: handlers, interceptors, stacks, AOP
//! rules, namespaces, results and templates described in YAML or JSON.
//! Types named in the manifest are turned into instances by an
//! [`ObjectFactory`](crate::action::ObjectFactory).
//!
//! ## Example
//!
//! ```yaml
//! settings:
//!   default_stack: basic
//! interceptors:
//!   - { name: trace, type: tracing }
//! stacks:
//!   - { name: basic, interceptors: [trace] }
//! aop:
//!   - { matches: "/admin/**", operation: add_before, interceptors: [trace] }
//! namespaces:
//!   - { name: admin, prefix: /admin }
//! templates:
//!   user: "user {{ params.id }}"
//! actions:
//!   - path: /users/{id}
//!     handler: users.show
//!     lifecycle: per_call
//!     results:
//!       - { name: success, type: render, location: user }
//!   - path: /panel
//!     namespace: admin
//!     handler: admin.panel
//! ```

mod apply;
mod load;
mod types;

pub use load::{load_manifest, parse_manifest, ManifestFormat};
pub use types::{ActionDecl, InterceptorDecl, Manifest};
