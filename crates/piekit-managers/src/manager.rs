//! The manager contract.

use piekit_config::PathConfig;
use piekit_core::PieResult;
use std::any::Any;

/// A named application service mounted into the `ManagersRegistry`.
pub trait Manager: Any {
    /// Registry name, e.g. `configs`.
    fn name(&self) -> &str;

    /// Names of managers that must be mounted first.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Brings the manager up.
    fn mount(&mut self, args: &[PathConfig]) -> PieResult<()>;

    /// Tears the manager down.
    fn unmount(&mut self) -> PieResult<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
