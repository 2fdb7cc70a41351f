//! Host side of the producer C ABI: a [`DashboardApi`] table whose entries
//! forward into a [`DashboardController`].

use dragometer_core::DashboardController;
use dragometer_plugin::ffi::{bytes_arg, ApiStatus, BoundField, DashboardApi, TextField};
use dragometer_plugin::{validate, Dashboard, DashboardError};
use std::ffi::c_void;
use std::marker::PhantomData;

/// Function table borrowed from a controller for the duration of a producer run.
pub struct HostApi<'a> {
    table: DashboardApi,
    _controller: PhantomData<&'a DashboardController>,
}

impl<'a> HostApi<'a> {
    pub fn new(controller: &'a DashboardController) -> Self {
        Self {
            table: DashboardApi {
                ctx: controller as *const DashboardController as *const c_void,
                add_plot,
                set_subplots,
                set_text,
                set_bound,
                plot,
            },
            _controller: PhantomData,
        }
    }

    pub fn table(&self) -> &DashboardApi {
        &self.table
    }
}

unsafe fn with_plot<F>(ctx: *const c_void, id: *const u8, id_len: usize, f: F) -> i32
where
    F: FnOnce(&DashboardController, &str) -> Result<(), DashboardError>,
{
    let Some(controller) = (unsafe { (ctx as *const DashboardController).as_ref() }) else {
        return ApiStatus::from_result(Err(DashboardError::Disconnected));
    };
    let id_bytes = unsafe { bytes_arg(id, id_len) };
    let result = validate::text("id", id_bytes).and_then(|id| f(controller, id));
    ApiStatus::from_result(result)
}

unsafe extern "C" fn add_plot(ctx: *const c_void, id: *const u8, id_len: usize) -> i32 {
    unsafe { with_plot(ctx, id, id_len, |controller, id| controller.add_plot(id)) }
}

unsafe extern "C" fn set_subplots(
    ctx: *const c_void,
    id: *const u8,
    id_len: usize,
    count: i64,
) -> i32 {
    unsafe {
        with_plot(ctx, id, id_len, |controller, id| {
            controller.set_subplots(id, validate::unsigned("count", count)?)
        })
    }
}

unsafe extern "C" fn set_text(
    ctx: *const c_void,
    id: *const u8,
    id_len: usize,
    field: u32,
    text: *const u8,
    text_len: usize,
) -> i32 {
    let text_bytes = unsafe { bytes_arg(text, text_len) };
    unsafe {
        with_plot(ctx, id, id_len, |controller, id| {
            let text = validate::text("title", text_bytes)?;
            match TextField::try_from(field)? {
                TextField::Title => controller.set_title(id, text),
                TextField::XAxisTitle => controller.set_x_axis_title(id, text),
                TextField::YAxisTitle => controller.set_y_axis_title(id, text),
            }
        })
    }
}

unsafe extern "C" fn set_bound(
    ctx: *const c_void,
    id: *const u8,
    id_len: usize,
    field: u32,
    value: f64,
) -> i32 {
    unsafe {
        with_plot(ctx, id, id_len, |controller, id| {
            match BoundField::try_from(field)? {
                BoundField::XMax => controller.set_x_max(id, value),
                BoundField::YMin => controller.set_y_min(id, value),
                BoundField::YMax => controller.set_y_max(id, value),
            }
        })
    }
}

unsafe extern "C" fn plot(
    ctx: *const c_void,
    id: *const u8,
    id_len: usize,
    x: f64,
    y: f64,
    subplot_index: i64,
) -> i32 {
    unsafe {
        with_plot(ctx, id, id_len, |controller, id| {
            let subplot_index = validate::unsigned("subplot_index", subplot_index)?;
            controller.plot_on(id, x, y, subplot_index)
        })
    }
}
