//! Doorwatch Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single cooperative tick loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  GpioDoorIo      WifiLink     MqttSession    Clock       │
//! │  (Sensor+Act.)   (LinkPort)   (SessionPort)  (time)      │
//! │                                                          │
//! │  ───────────── Port Trait Boundary ─────────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │            AppService (pure logic)             │      │
//! │  │  DoorMonitor · AlertSequencer · Supervisors    │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every component is tick-driven and non-blocking; the loop below runs
//! at the configured poll interval (10 ms), well inside the shortest
//! beep half-cycle.

#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use doorwatch::adapters::hardware::GpioDoorIo;
use doorwatch::adapters::log_sink::LogEventSink;
use doorwatch::adapters::mqtt::MqttSession;
use doorwatch::adapters::time::Clock;
use doorwatch::adapters::wifi::WifiLink;
use doorwatch::app::ports::SensorPort;
use doorwatch::app::service::AppService;
use doorwatch::config::SystemConfig;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Doorwatch v{} starting", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();

    // ── 2. Construct adapters ─────────────────────────────────
    let mut hw = GpioDoorIo::new(&config).map_err(|e| anyhow::anyhow!("hw init: {e}"))?;
    let clock = Clock::new();
    let mut sink = LogEventSink::new();
    let mut link = WifiLink::new(&config);

    #[cfg(target_os = "espidf")]
    {
        let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
        let sysloop = esp_idf_svc::eventloop::EspSystemEventLoop::take()?;
        let nvs = esp_idf_svc::nvs::EspDefaultNvsPartition::take()?;
        let wifi = esp_idf_svc::wifi::EspWifi::new(peripherals.modem, sysloop, Some(nvs))?;
        link.attach(Box::new(wifi));
    }

    let mut session = MqttSession::new(&config);

    // ── 3. Construct app service ──────────────────────────────
    // Seed the confirmed door state from the first read so power-up never
    // reports a phantom transition.
    let initial_level = hw.read_door_level().unwrap_or(true);
    let mut app = AppService::new(config.clone(), initial_level);
    app.start(clock.now_ms(), &mut link, &mut sink);

    info!("System ready. Monitoring hall sensor...");

    // ── 4. Cooperative tick loop ──────────────────────────────
    loop {
        app.tick(clock.now_ms(), &mut hw, &mut link, &mut session, &mut sink);
        std::thread::sleep(std::time::Duration::from_millis(u64::from(
            config.poll_interval_ms,
        )));
    }
}
