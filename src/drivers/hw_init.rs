//! GPIO peripheral initialisation and raw pin helpers.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: thin unsafe wrappers over the C GPIO driver
//! (`gpio_config` / `gpio_set_level`). On host/test: inert stubs —
//! adapters substitute simulated levels.

#[cfg(target_os = "espidf")]
use crate::error::Error;
use crate::error::Result;

/// Configure a pin as input with internal pull-up (hall sensor).
#[cfg(target_os = "espidf")]
pub fn configure_input_pullup(pin: i32) -> Result<()> {
    use esp_idf_svc::sys;
    let cfg = sys::gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: sys::gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: sys::gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: sys::gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: sys::gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    if unsafe { sys::gpio_config(&cfg) } != sys::ESP_OK {
        return Err(Error::Init("gpio input config failed"));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn configure_input_pullup(_pin: i32) -> Result<()> {
    Ok(())
}

/// Configure a pin as push-pull output, driven low.
#[cfg(target_os = "espidf")]
pub fn configure_output(pin: i32) -> Result<()> {
    use esp_idf_svc::sys;
    let cfg = sys::gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: sys::gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: sys::gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: sys::gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: sys::gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    if unsafe { sys::gpio_config(&cfg) } != sys::ESP_OK {
        return Err(Error::Init("gpio output config failed"));
    }
    gpio_write(pin, false);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn configure_output(_pin: i32) -> Result<()> {
    Ok(())
}

/// Route the hall pin's any-edge interrupt into the door ISR slot, so a
/// pulse shorter than one poll period still reaches the debounce window.
#[cfg(target_os = "espidf")]
pub fn attach_door_isr(pin: i32) -> Result<()> {
    use esp_idf_svc::sys;

    unsafe extern "C" fn on_edge(arg: *mut core::ffi::c_void) {
        let pin = arg as usize as i32;
        // ISR context: read the level and record it, nothing else.
        let level = unsafe { sys::gpio_get_level(pin) };
        crate::sensors::door::door_isr_handler(level != 0);
    }

    unsafe {
        let rc = sys::gpio_install_isr_service(0);
        // ESP_ERR_INVALID_STATE: the service is already installed.
        if rc != sys::ESP_OK && rc != sys::ESP_ERR_INVALID_STATE {
            return Err(Error::Init("gpio isr service install failed"));
        }
        if sys::gpio_set_intr_type(pin, sys::gpio_int_type_t_GPIO_INTR_ANYEDGE) != sys::ESP_OK {
            return Err(Error::Init("gpio interrupt type config failed"));
        }
        if sys::gpio_isr_handler_add(pin, Some(on_edge), pin as usize as *mut core::ffi::c_void)
            != sys::ESP_OK
        {
            return Err(Error::Init("gpio isr handler registration failed"));
        }
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn attach_door_isr(_pin: i32) -> Result<()> {
    Ok(())
}

/// Read a digital input. `None` if the read fails.
#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> Option<bool> {
    let level = unsafe { esp_idf_svc::sys::gpio_get_level(pin) };
    if level < 0 {
        return None;
    }
    Some(level != 0)
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> Option<bool> {
    None
}

/// Drive a digital output. Failures are logged and otherwise ignored —
/// there is nothing a caller can do about a dead pin at runtime.
#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, level: bool) {
    let rc = unsafe { esp_idf_svc::sys::gpio_set_level(pin, u32::from(level)) };
    if rc != esp_idf_svc::sys::ESP_OK {
        log::warn!("gpio_set_level({pin}) failed: {rc}");
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _level: bool) {}
