// Capability registry - the layers and instance extensions this app asks for.

use ash::extensions::{ext, khr};
use ash::vk;
use raw_window_handle::RawDisplayHandle;
use std::ffi::CStr;

use super::{BootstrapError, BootstrapResult};

/// Validation layers requested when diagnostics are enabled.
pub const VALIDATION_LAYERS: [&CStr; 1] = [c"VK_LAYER_KHRONOS_validation"];

/// Layer names to enable at instance creation.
pub fn required_layers(validation: bool) -> &'static [&'static CStr] {
    if validation {
        &VALIDATION_LAYERS
    } else {
        &[]
    }
}

/// Instance extensions to enable: whatever the windowing system needs to
/// present, plus the debug-utils extension when validation is on.
pub fn required_instance_extensions(
    display_handle: RawDisplayHandle,
    validation: bool,
) -> BootstrapResult<Vec<&'static CStr>> {
    let mut extensions = surface_extensions(display_handle)?;

    if validation {
        extensions.push(ext::DebugUtils::name());
    }

    Ok(extensions)
}

/// Surface extensions for the display system behind the raw handle.
///
/// The display system is only known at runtime (winit may have connected to
/// X11 or Wayland), so the names are picked off the handle variant rather
/// than a compile-time platform switch.
fn surface_extensions(display_handle: RawDisplayHandle) -> BootstrapResult<Vec<&'static CStr>> {
    let extensions = match display_handle {
        RawDisplayHandle::Windows(_) => vec![khr::Surface::name(), khr::Win32Surface::name()],
        RawDisplayHandle::Wayland(_) => vec![khr::Surface::name(), khr::WaylandSurface::name()],
        RawDisplayHandle::Xlib(_) => vec![khr::Surface::name(), khr::XlibSurface::name()],
        RawDisplayHandle::Xcb(_) => vec![khr::Surface::name(), khr::XcbSurface::name()],
        RawDisplayHandle::Android(_) => vec![khr::Surface::name(), khr::AndroidSurface::name()],
        RawDisplayHandle::AppKit(_) | RawDisplayHandle::UiKit(_) => {
            vec![khr::Surface::name(), ext::MetalSurface::name()]
        }
        other => {
            log::error!("No Vulkan surface extension for display system {:?}", other);
            return Err(BootstrapError::InstanceCreationFailed(
                vk::Result::ERROR_EXTENSION_NOT_PRESENT,
            ));
        }
    };

    Ok(extensions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{
        AppKitDisplayHandle, HaikuDisplayHandle, WaylandDisplayHandle, WindowsDisplayHandle,
        XlibDisplayHandle,
    };
    use std::ptr::NonNull;

    fn xlib() -> RawDisplayHandle {
        RawDisplayHandle::Xlib(XlibDisplayHandle::new(None, 0))
    }

    #[test]
    fn validation_toggles_requested_layers() {
        assert_eq!(required_layers(true), &VALIDATION_LAYERS[..]);
        assert!(required_layers(false).is_empty());
    }

    #[test]
    fn khronos_validation_is_the_only_layer() {
        assert_eq!(VALIDATION_LAYERS.len(), 1);
        assert_eq!(
            VALIDATION_LAYERS[0].to_bytes(),
            b"VK_LAYER_KHRONOS_validation"
        );
    }

    #[test]
    fn surface_extensions_follow_the_display_system() {
        let windows = RawDisplayHandle::Windows(WindowsDisplayHandle::new());
        assert_eq!(
            surface_extensions(windows).unwrap(),
            [khr::Surface::name(), khr::Win32Surface::name()]
        );

        let wayland = RawDisplayHandle::Wayland(WaylandDisplayHandle::new(NonNull::dangling()));
        assert_eq!(
            surface_extensions(wayland).unwrap(),
            [khr::Surface::name(), khr::WaylandSurface::name()]
        );

        assert_eq!(
            surface_extensions(xlib()).unwrap(),
            [khr::Surface::name(), khr::XlibSurface::name()]
        );

        let appkit = RawDisplayHandle::AppKit(AppKitDisplayHandle::new());
        assert_eq!(
            surface_extensions(appkit).unwrap(),
            [khr::Surface::name(), ext::MetalSurface::name()]
        );
    }

    #[test]
    fn debug_utils_rides_along_only_with_validation() {
        let with = required_instance_extensions(xlib(), true).unwrap();
        assert_eq!(with.last().copied(), Some(ext::DebugUtils::name()));

        let without = required_instance_extensions(xlib(), false).unwrap();
        assert!(!without.contains(&ext::DebugUtils::name()));
        assert_eq!(without.len(), 2);
    }

    #[test]
    fn unsupported_display_system_is_rejected() {
        let haiku = RawDisplayHandle::Haiku(HaikuDisplayHandle::new());
        assert!(matches!(
            surface_extensions(haiku),
            Err(BootstrapError::InstanceCreationFailed(
                vk::Result::ERROR_EXTENSION_NOT_PRESENT
            ))
        ));
    }
}
