use crate::builtin::find_builtin;
use crate::error::ProducerError;
use crate::host_api::HostApi;
use dragometer_core::DashboardController;
use dragometer_plugin::ffi::{
    panic_message, DashboardApi, ProducerString, DRAGOMETER_ABI_VERSION,
    DRAGOMETER_ABI_VERSION_SYMBOL, DRAGOMETER_ENTRY_SYMBOL,
};
use dragometer_plugin::ProducerEntry;
use libloading::Library;
use std::env::consts::{DLL_EXTENSION, DLL_PREFIX};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

type ExportedMain = unsafe extern "C" fn(*const DashboardApi) -> ProducerString;

/// A producer library opened with its entry point resolved.
pub struct DynamicProducer {
    _lib: Library,
    entry: ExportedMain,
    path: PathBuf,
}

impl std::fmt::Debug for DynamicProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicProducer")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl DynamicProducer {
    /// Opens `path` and resolves the exported producer symbols.
    ///
    /// # Safety
    /// Loading a library runs its initialisers; `path` must name a producer
    /// built against this version of `dragometer-plugin`.
    pub unsafe fn load(path: &Path) -> Result<Self, ProducerError> {
        let lib = unsafe { Library::new(path) }.map_err(|err| ProducerError::Load {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let entry: ExportedMain = match unsafe {
            lib.get::<ExportedMain>(DRAGOMETER_ENTRY_SYMBOL.as_bytes())
        } {
            Ok(symbol) => *symbol,
            Err(_) => return Err(ProducerError::MissingEntryPoint(path.to_path_buf())),
        };
        let version = match unsafe {
            lib.get::<unsafe extern "C" fn() -> u32>(DRAGOMETER_ABI_VERSION_SYMBOL.as_bytes())
        } {
            Ok(symbol) => unsafe { symbol() },
            Err(_) => return Err(ProducerError::MissingAbiVersion(path.to_path_buf())),
        };
        if version != DRAGOMETER_ABI_VERSION {
            return Err(ProducerError::AbiMismatch {
                path: path.to_path_buf(),
                found: version,
                expected: DRAGOMETER_ABI_VERSION,
            });
        }
        Ok(Self {
            _lib: lib,
            entry,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn run(&self, controller: &DashboardController) -> Result<(), ProducerError> {
        let host = HostApi::new(controller);
        let message = unsafe { (self.entry)(host.table()).into_string() };
        match message {
            None => Ok(()),
            Some(message) => Err(ProducerError::Failed(message)),
        }
    }
}

#[derive(Debug)]
pub enum Producer {
    BuiltIn {
        name: String,
        entry: ProducerEntry,
    },
    Dynamic(DynamicProducer),
}

impl Producer {
    pub fn name(&self) -> String {
        match self {
            Producer::BuiltIn { name, .. } => name.clone(),
            Producer::Dynamic(dynamic) => dynamic.path().display().to_string(),
        }
    }

    /// Runs the producer to completion on the calling thread.
    pub fn run(&self, controller: &DashboardController) -> Result<(), ProducerError> {
        match self {
            Producer::BuiltIn { entry, .. } => {
                match panic::catch_unwind(AssertUnwindSafe(|| entry(controller))) {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(err)) => Err(ProducerError::Failed(err.to_string())),
                    Err(payload) => Err(ProducerError::Failed(panic_message(payload.as_ref()))),
                }
            }
            Producer::Dynamic(dynamic) => dynamic.run(controller),
        }
    }
}

/// Library paths tried for `identifier`, in order.
pub fn library_candidates(identifier: &str) -> Result<Vec<PathBuf>, ProducerError> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() || trimmed.contains('\0') {
        return Err(ProducerError::InvalidIdentifier(identifier.to_string()));
    }
    let path = Path::new(trimmed);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| ProducerError::InvalidIdentifier(identifier.to_string()))?;
    let base = path.with_extension("");
    let dir = base.parent().unwrap_or_else(|| Path::new(""));

    let mut beside = base.clone().into_os_string();
    beside.push(format!(".{DLL_EXTENSION}"));
    let mut candidates = vec![PathBuf::from(beside)];
    let prefixed = dir.join(format!("{DLL_PREFIX}{stem}.{DLL_EXTENSION}"));
    if !candidates.contains(&prefixed) {
        candidates.push(prefixed);
    }
    Ok(candidates)
}

/// Resolves a producer by built-in name or library path.
///
/// The entry point is resolved here so a broken producer is reported before
/// any window opens.
pub fn resolve_producer(identifier: &str) -> Result<Producer, ProducerError> {
    if let Some(entry) = find_builtin(identifier.trim()) {
        return Ok(Producer::BuiltIn {
            name: identifier.trim().to_string(),
            entry,
        });
    }
    let candidates = library_candidates(identifier)?;
    for candidate in &candidates {
        if candidate.is_file() {
            log::info!("loading producer library {}", candidate.display());
            let dynamic = unsafe { DynamicProducer::load(candidate) }?;
            return Ok(Producer::Dynamic(dynamic));
        }
    }
    let tried = candidates
        .iter()
        .map(|candidate| candidate.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(ProducerError::NotFound {
        identifier: identifier.to_string(),
        tried,
    })
}
