// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Markers restrict which wait and publish calls are available at compile time.

use crate::types::PublishMode;

/// Uploaded: the service accepted the bundle and assigned an id.
/// Available actions: `wait_for_validation()`
#[derive(Debug, Clone, Copy)]
pub struct Uploaded {
    pub(crate) mode: PublishMode,
}

/// Validated: validation passed without errors.
/// Available actions: `publish()`, `wait_for_publishing()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Validated;

/// Publishing: the service is pushing the deployment out.
/// Available actions: `wait_for_publishing()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Publishing;

/// Published: terminal success.
#[derive(Debug, Clone, Copy, Default)]
pub struct Published;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Validated {}
    impl Sealed for super::Publishing {}
}

/// States from which the publishing phase can be awaited.
pub trait AwaitingPublication: sealed::Sealed {}

impl AwaitingPublication for Validated {}
impl AwaitingPublication for Publishing {}
