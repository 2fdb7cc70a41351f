//! C ABI between the host and producers compiled as dynamic libraries.
//!
//! The host hands a producer a [`DashboardApi`] table whose function pointers
//! forward into its dashboard controller. Strings cross as UTF-8 byte slices;
//! results cross as [`ApiStatus`] codes.

use crate::{validate, Dashboard, DashboardError, ProducerEntry};
use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};

/// Bumped whenever [`DashboardApi`] changes layout.
pub const DRAGOMETER_ABI_VERSION: u32 = 1;
pub const DRAGOMETER_ABI_VERSION_SYMBOL: &str = "dragometer_abi_version";
pub const DRAGOMETER_ENTRY_SYMBOL: &str = "dragometer_main";

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Ok = 0,
    InvalidArgument = 1,
    Disconnected = 2,
    Other = 3,
}

impl ApiStatus {
    pub fn from_result(result: Result<(), DashboardError>) -> i32 {
        let status = match result {
            Ok(()) => ApiStatus::Ok,
            Err(DashboardError::InvalidArgument(_)) => ApiStatus::InvalidArgument,
            Err(DashboardError::Disconnected) => ApiStatus::Disconnected,
            Err(_) => ApiStatus::Other,
        };
        status as i32
    }

    pub fn into_result(code: i32, operation: &str) -> Result<(), DashboardError> {
        match code {
            0 => Ok(()),
            1 => Err(DashboardError::InvalidArgument(format!(
                "host rejected arguments of {operation}"
            ))),
            2 => Err(DashboardError::Disconnected),
            other => Err(DashboardError::InvalidArgument(format!(
                "host returned status {other} for {operation}"
            ))),
        }
    }
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title = 0,
    XAxisTitle = 1,
    YAxisTitle = 2,
}

impl TryFrom<u32> for TextField {
    type Error = DashboardError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TextField::Title),
            1 => Ok(TextField::XAxisTitle),
            2 => Ok(TextField::YAxisTitle),
            other => Err(DashboardError::InvalidArgument(format!(
                "unknown text field {other}"
            ))),
        }
    }
}

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundField {
    XMax = 0,
    YMin = 1,
    YMax = 2,
}

impl TryFrom<u32> for BoundField {
    type Error = DashboardError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BoundField::XMax),
            1 => Ok(BoundField::YMin),
            2 => Ok(BoundField::YMax),
            other => Err(DashboardError::InvalidArgument(format!(
                "unknown bound field {other}"
            ))),
        }
    }
}

#[repr(C)]
pub struct DashboardApi {
    pub ctx: *const c_void,
    pub add_plot: unsafe extern "C" fn(ctx: *const c_void, id: *const u8, id_len: usize) -> i32,
    pub set_subplots:
        unsafe extern "C" fn(ctx: *const c_void, id: *const u8, id_len: usize, count: i64) -> i32,
    pub set_text: unsafe extern "C" fn(
        ctx: *const c_void,
        id: *const u8,
        id_len: usize,
        field: u32,
        text: *const u8,
        text_len: usize,
    ) -> i32,
    pub set_bound: unsafe extern "C" fn(
        ctx: *const c_void,
        id: *const u8,
        id_len: usize,
        field: u32,
        value: f64,
    ) -> i32,
    pub plot: unsafe extern "C" fn(
        ctx: *const c_void,
        id: *const u8,
        id_len: usize,
        x: f64,
        y: f64,
        subplot_index: i64,
    ) -> i32,
}

/// Owned UTF-8 buffer handed from a producer back to the host.
///
/// A null `ptr` means "no message".
#[repr(C)]
pub struct ProducerString {
    pub ptr: *mut u8,
    pub len: usize,
}

impl ProducerString {
    pub fn none() -> Self {
        Self {
            ptr: std::ptr::null_mut(),
            len: 0,
        }
    }

    pub fn from_string(value: String) -> Self {
        let boxed = value.into_bytes().into_boxed_slice();
        let len = boxed.len();
        let ptr = Box::into_raw(boxed) as *mut u8;
        Self { ptr, len }
    }

    /// Takes ownership of the buffer.
    ///
    /// # Safety
    /// `self` must come from [`ProducerString::from_string`] or
    /// [`ProducerString::none`] and must not have been consumed before.
    pub unsafe fn into_string(self) -> Option<String> {
        if self.ptr.is_null() {
            return None;
        }
        let slice = std::ptr::slice_from_raw_parts_mut(self.ptr, self.len);
        let bytes = unsafe { Box::from_raw(slice) };
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Reads a byte slice passed across the ABI. A null pointer reads as empty.
///
/// # Safety
/// When non-null, `ptr` must be valid for reads of `len` bytes for `'a`.
pub unsafe fn bytes_arg<'a>(ptr: *const u8, len: usize) -> &'a [u8] {
    if ptr.is_null() || len == 0 {
        return &[];
    }
    unsafe { std::slice::from_raw_parts(ptr, len) }
}

/// Producer-side [`Dashboard`] backed by a host [`DashboardApi`] table.
pub struct RemoteDashboard<'a> {
    api: &'a DashboardApi,
}

impl<'a> RemoteDashboard<'a> {
    pub fn new(api: &'a DashboardApi) -> Self {
        Self { api }
    }

    fn set_text(&self, id: &str, field: TextField, text: &str) -> Result<(), DashboardError> {
        validate::plot_id(id)?;
        let code = unsafe {
            (self.api.set_text)(
                self.api.ctx,
                id.as_ptr(),
                id.len(),
                field as u32,
                text.as_ptr(),
                text.len(),
            )
        };
        ApiStatus::into_result(code, "set_text")
    }

    fn set_bound(&self, id: &str, field: BoundField, value: f64) -> Result<(), DashboardError> {
        validate::plot_id(id)?;
        let code =
            unsafe { (self.api.set_bound)(self.api.ctx, id.as_ptr(), id.len(), field as u32, value) };
        ApiStatus::into_result(code, "set_bound")
    }
}

impl Dashboard for RemoteDashboard<'_> {
    fn add_plot(&self, id: &str) -> Result<(), DashboardError> {
        validate::plot_id(id)?;
        let code = unsafe { (self.api.add_plot)(self.api.ctx, id.as_ptr(), id.len()) };
        ApiStatus::into_result(code, "add_plot")
    }

    fn set_subplots(&self, id: &str, count: usize) -> Result<(), DashboardError> {
        validate::plot_id(id)?;
        let count = validate::subplot_count(count)?;
        let count = i64::try_from(count)
            .map_err(|_| DashboardError::InvalidArgument("count is too large".to_string()))?;
        let code = unsafe { (self.api.set_subplots)(self.api.ctx, id.as_ptr(), id.len(), count) };
        ApiStatus::into_result(code, "set_subplots")
    }

    fn set_title(&self, id: &str, title: &str) -> Result<(), DashboardError> {
        self.set_text(id, TextField::Title, title)
    }

    fn set_x_axis_title(&self, id: &str, title: &str) -> Result<(), DashboardError> {
        self.set_text(id, TextField::XAxisTitle, title)
    }

    fn set_y_axis_title(&self, id: &str, title: &str) -> Result<(), DashboardError> {
        self.set_text(id, TextField::YAxisTitle, title)
    }

    fn set_x_max(&self, id: &str, x_max: f64) -> Result<(), DashboardError> {
        let x_max = validate::non_negative("x_max", x_max)?;
        self.set_bound(id, BoundField::XMax, x_max)
    }

    fn set_y_min(&self, id: &str, y_min: f64) -> Result<(), DashboardError> {
        let y_min = validate::finite("y_min", y_min)?;
        self.set_bound(id, BoundField::YMin, y_min)
    }

    fn set_y_max(&self, id: &str, y_max: f64) -> Result<(), DashboardError> {
        let y_max = validate::finite("y_max", y_max)?;
        self.set_bound(id, BoundField::YMax, y_max)
    }

    fn plot_on(
        &self,
        id: &str,
        x: f64,
        y: f64,
        subplot_index: usize,
    ) -> Result<(), DashboardError> {
        validate::plot_id(id)?;
        let x = validate::non_negative("x", x)?;
        let y = validate::finite("y", y)?;
        let index = i64::try_from(subplot_index).map_err(|_| {
            DashboardError::InvalidArgument("subplot_index is too large".to_string())
        })?;
        let code = unsafe { (self.api.plot)(self.api.ctx, id.as_ptr(), id.len(), x, y, index) };
        ApiStatus::into_result(code, "plot")
    }
}

/// Runs `entry` against the host table, turning errors and panics into a message.
///
/// # Safety
/// `api` must be null or point to a table that stays valid for the whole call.
pub unsafe fn run_exported(api: *const DashboardApi, entry: ProducerEntry) -> ProducerString {
    let Some(api) = (unsafe { api.as_ref() }) else {
        return ProducerString::from_string("host passed a null dashboard table".to_string());
    };
    let dashboard = RemoteDashboard::new(api);
    match panic::catch_unwind(AssertUnwindSafe(|| entry(&dashboard))) {
        Ok(Ok(())) => ProducerString::none(),
        Ok(Err(err)) => ProducerString::from_string(err.to_string()),
        Err(payload) => ProducerString::from_string(panic_message(payload.as_ref())),
    }
}

pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("producer panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("producer panicked: {message}")
    } else {
        "producer panicked".to_string()
    }
}

/// Exports `entry` (a [`ProducerEntry`](crate::ProducerEntry)) under the
/// symbols the Dragometer host resolves when loading a producer library.
#[macro_export]
macro_rules! export_producer {
    ($entry:path) => {
        #[no_mangle]
        pub extern "C" fn dragometer_abi_version() -> u32 {
            $crate::ffi::DRAGOMETER_ABI_VERSION
        }

        /// # Safety
        /// Called by the Dragometer host with a table that outlives the call.
        #[no_mangle]
        pub unsafe extern "C" fn dragometer_main(
            api: *const $crate::ffi::DashboardApi,
        ) -> $crate::ffi::ProducerString {
            unsafe { $crate::ffi::run_exported(api, $entry) }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn producer_string_round_trips_messages() {
        let message = ProducerString::from_string("boom".to_string());
        assert_eq!(unsafe { message.into_string() }, Some("boom".to_string()));
        assert_eq!(unsafe { ProducerString::none().into_string() }, None);
    }

    #[test]
    fn status_codes_map_back_to_errors() {
        assert_eq!(ApiStatus::from_result(Ok(())), 0);
        assert_eq!(
            ApiStatus::from_result(Err(DashboardError::Disconnected)),
            ApiStatus::Disconnected as i32
        );
        assert_eq!(
            ApiStatus::into_result(2, "plot"),
            Err(DashboardError::Disconnected)
        );
        assert!(matches!(
            ApiStatus::into_result(1, "plot"),
            Err(DashboardError::InvalidArgument(_))
        ));
    }

    #[test]
    fn field_codes_reject_unknown_values() {
        assert_eq!(TextField::try_from(1), Ok(TextField::XAxisTitle));
        assert!(TextField::try_from(9).is_err());
        assert_eq!(BoundField::try_from(2), Ok(BoundField::YMax));
        assert!(BoundField::try_from(3).is_err());
    }
}
