//! Opening LADSPA libraries and reading their descriptors.

use super::ffi::{self, DescriptorFn, LadspaDescriptor, LadspaPortRangeHint, PortDescriptor};
use crate::error::{LoadStage, PluginError, Result};
use std::ffi::c_ulong;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

/// An opened plugin library and its descriptor entry point.
///
/// Descriptors handed out by [`LadspaLibrary::find`] point into the library and
/// must not outlive it.
pub struct LadspaLibrary {
    path: PathBuf,
    entry: DescriptorFn,
    _library: Option<libloading::Library>,
}

impl std::fmt::Debug for LadspaLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LadspaLibrary")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl LadspaLibrary {
    /// Load a shared library and resolve `ladspa_descriptor`.
    pub fn open(path: &Path) -> Result<Self> {
        // SAFETY: running a library's initializers is inherent to hosting it.
        let library = unsafe {
            libloading::Library::new(path).map_err(|e| PluginError::LoadFailed {
                path: path.to_path_buf(),
                stage: LoadStage::Opening,
                reason: format!("Failed to load library: {e}"),
            })?
        };

        // SAFETY: the signature is fixed by the LADSPA ABI.
        let entry: DescriptorFn = unsafe {
            let symbol: libloading::Symbol<DescriptorFn> = library
                .get(ffi::DESCRIPTOR_SYMBOL.as_bytes())
                .map_err(|e| {
                    tracing::debug!(path = %path.display(), error = %e, "no descriptor symbol");
                    PluginError::MissingSymbol {
                        path: path.to_path_buf(),
                        symbol: ffi::DESCRIPTOR_SYMBOL,
                    }
                })?;
            *symbol
        };

        tracing::debug!(path = %path.display(), "opened LADSPA library");

        Ok(Self {
            path: path.to_path_buf(),
            entry,
            _library: Some(library),
        })
    }

    /// Wrap an entry point linked into the current binary.
    pub fn from_entry(name: impl Into<PathBuf>, entry: DescriptorFn) -> Self {
        Self {
            path: name.into(),
            entry,
            _library: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every descriptor the library enumerates, in index order.
    pub fn descriptors(&self) -> Vec<Descriptor> {
        (0..)
            .map_while(|index| self.descriptor(index))
            .collect()
    }

    /// First descriptor whose label is `label`.
    pub fn find(&self, label: &str) -> Result<Descriptor> {
        (0..)
            .map_while(|index| self.descriptor(index))
            .find(|d| d.label() == Some(label))
            .ok_or_else(|| PluginError::LabelNotFound {
                label: label.to_owned(),
            })
    }

    fn descriptor(&self, index: c_ulong) -> Option<Descriptor> {
        // SAFETY: the entry point returns null past the end, otherwise a
        // descriptor valid for as long as the library stays loaded.
        let ptr = unsafe { (self.entry)(index) };
        NonNull::new(ptr.cast_mut()).map(|ptr| Descriptor { ptr })
    }
}

/// One port as declared by a descriptor.
#[derive(Debug, Clone, Copy)]
pub struct PortDecl<'a> {
    pub index: u32,
    pub descriptor: PortDescriptor,
    pub name: &'a str,
    pub hint: LadspaPortRangeHint,
}

/// Borrowed view of a plugin descriptor owned by a [`LadspaLibrary`].
#[derive(Clone, Copy)]
pub struct Descriptor {
    ptr: NonNull<LadspaDescriptor>,
}

// SAFETY: descriptors are immutable static data inside the library; the
// owning adapter keeps the library alive for as long as it holds one.
unsafe impl Send for Descriptor {}
unsafe impl Sync for Descriptor {}

impl Descriptor {
    #[inline]
    pub(crate) fn raw(&self) -> &LadspaDescriptor {
        // SAFETY: non-null, and valid while the library is loaded.
        unsafe { self.ptr.as_ref() }
    }

    pub(crate) fn as_ptr(&self) -> *const LadspaDescriptor {
        self.ptr.as_ptr()
    }

    pub fn unique_id(&self) -> u64 {
        self.raw().unique_id as u64
    }

    pub fn label(&self) -> Option<&str> {
        // SAFETY: descriptor strings live as long as the descriptor.
        unsafe { ffi::c_str(self.raw().label) }
    }

    pub fn name(&self) -> Option<&str> {
        // SAFETY: as above.
        unsafe { ffi::c_str(self.raw().name) }
    }

    pub fn maker(&self) -> Option<&str> {
        // SAFETY: as above.
        unsafe { ffi::c_str(self.raw().maker) }
    }

    pub fn copyright(&self) -> Option<&str> {
        // SAFETY: as above.
        unsafe { ffi::c_str(self.raw().copyright) }
    }

    pub fn properties(&self) -> i32 {
        self.raw().properties
    }

    /// Needs to run on a realtime-capable thread (e.g. talks to hardware).
    pub fn is_realtime(&self) -> bool {
        self.properties() & ffi::PROPERTY_REALTIME != 0
    }

    /// Input and output buffers must not alias.
    pub fn is_inplace_broken(&self) -> bool {
        self.properties() & ffi::PROPERTY_INPLACE_BROKEN != 0
    }

    pub fn is_hard_rt_capable(&self) -> bool {
        self.properties() & ffi::PROPERTY_HARD_RT_CAPABLE != 0
    }

    pub fn port_count(&self) -> u32 {
        let raw = self.raw();
        if raw.port_descriptors.is_null()
            || raw.port_names.is_null()
            || raw.port_range_hints.is_null()
        {
            return 0;
        }
        raw.port_count as u32
    }

    pub fn port(&self, index: u32) -> Option<PortDecl<'_>> {
        if index >= self.port_count() {
            return None;
        }
        let raw = self.raw();
        let i = index as usize;
        // SAFETY: the three port arrays hold `port_count` entries each.
        unsafe {
            let descriptor = PortDescriptor(*raw.port_descriptors.add(i));
            let name = ffi::c_str(*raw.port_names.add(i)).unwrap_or("");
            let hint = *raw.port_range_hints.add(i);
            Some(PortDecl {
                index,
                descriptor,
                name,
                hint,
            })
        }
    }

    pub fn ports(&self) -> impl Iterator<Item = PortDecl<'_>> {
        (0..self.port_count()).filter_map(move |i| self.port(i))
    }

    /// Whether the mandatory lifecycle calls are present.
    pub fn is_usable(&self) -> bool {
        let raw = self.raw();
        raw.instantiate.is_some() && raw.connect_port.is_some() && raw.run.is_some()
    }
}

impl std::fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Descriptor")
            .field("label", &self.label())
            .field("unique_id", &self.unique_id())
            .field("ports", &self.port_count())
            .finish()
    }
}
