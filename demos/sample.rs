//! Subscription lifecycle demo.
//!
//! Runs a short scripted session through the virtual backends with an
//! [`InputLogger`] attached, then detaches it and prints the session recorded
//! as JSON lines. With `--native` (Windows only)
//! it polls the real keyboard, mouse and pad for five seconds instead.
//!
//! ```text
//! RUST_LOG=info cargo run --example sample
//! RUST_LOG=info cargo run --example sample -- --native
//! ```

use inputcast::backends::{native_query, VirtualInput, VirtualXr};
use inputcast::{
    Axis2, DispatcherConfig, DispatcherSlot, InputDispatcher, InputLogger, KeyCode, MouseButton,
    Notification, XrAxis, XrButton,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if std::env::args().any(|a| a == "--native") {
        run_native();
    } else {
        run_scripted();
    }
}

fn run_scripted() {
    let mut slot = DispatcherSlot::new();
    slot.install(InputDispatcher::with_xr(
        VirtualInput::new(),
        VirtualXr::new(true),
        DispatcherConfig::default(),
    ));
    // A second dispatcher is discarded; the first one stays active.
    slot.install(InputDispatcher::with_xr(
        VirtualInput::new(),
        VirtualXr::new(false),
        DispatcherConfig::default().with_verbose(true),
    ));
    let Some(dispatcher) = slot.get_mut() else {
        return;
    };

    let mut logger = InputLogger::new();
    logger.attach(dispatcher.channels(), dispatcher.xr_enabled());

    let recording = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&recording);
    dispatcher
        .channels()
        .any
        .subscribe(move |n: &Notification| match serde_json::to_string(n) {
            Ok(line) => sink.borrow_mut().push(line),
            Err(e) => tracing::warn!(%e, "could not record notification"),
        });

    dispatcher.devices_mut().press_key(KeyCode::Space);
    dispatcher.devices_mut().press_mouse(MouseButton::Left);
    dispatcher.devices_mut().move_mouse(Axis2::new(4.0, -1.0));
    dispatcher.poll_frame();

    dispatcher.devices_mut().release_key(KeyCode::Space);
    dispatcher.devices_mut().release_mouse(MouseButton::Left);
    dispatcher.devices_mut().press_action("Jump");
    dispatcher.devices_mut().set_axis("Horizontal", 0.5);
    dispatcher.poll_frame();

    dispatcher.devices_mut().release_action("Jump");
    dispatcher.devices_mut().set_axis("Horizontal", 0.0);
    dispatcher.xr_mut().set_button("Right Hand", XrButton::Trigger, true);
    dispatcher
        .xr_mut()
        .set_axis("Right Hand", XrAxis::Primary2D, Axis2::new(0.0, 0.8));
    dispatcher.poll_frame();

    logger.detach(dispatcher.channels());
    dispatcher.poll_frame();

    println!(
        "{} frames polled, {} notifications logged",
        dispatcher.frames_polled(),
        logger.received()
    );
    println!("recorded session:");
    for line in recording.borrow().iter() {
        println!("  {line}");
    }
}

fn run_native() {
    let Some(devices) = native_query() else {
        eprintln!("no native input backend for this target");
        return;
    };

    let mut dispatcher = InputDispatcher::new(devices, DispatcherConfig::default());
    let mut logger = InputLogger::new();
    logger.attach(dispatcher.channels(), dispatcher.xr_enabled());

    let started = Instant::now();
    while started.elapsed() < Duration::from_secs(5) {
        dispatcher.poll_frame();
        std::thread::sleep(Duration::from_millis(16));
    }

    logger.detach(dispatcher.channels());
    println!("{} notifications logged", logger.received());
}
