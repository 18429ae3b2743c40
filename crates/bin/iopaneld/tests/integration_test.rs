//! End-to-end smoke tests for the full iopaneld stack.
//!
//! Each test wires the real hub, real adapters, and the broadcast state bus
//! over a scripted in-memory bus transport — no physical panel, no process
//! glue.

use std::sync::Arc;
use std::time::Duration;

use iopanel_domain::config::{EntityOptions, OutputConfig, TwoWayConfig};
use iopanel_domain::error::IoPanelError;
use iopanel_entities::binary_sensor::BinarySensor;
use iopanel_entities::cover::Cover;
use iopanel_entities::light::Light;
use iopanel_entities::notify::{StateBus, StateNotifier};
use iopanel_entities::switch::Switch;
use iopanel_hub::bus::PanelBus;
use iopanel_hub::bus::testing::RecordingBus;
use iopanel_hub::hub::Hub;

fn options(toml: &str) -> EntityOptions {
    toml::from_str(toml).expect("options should parse")
}

fn cover_options() -> EntityOptions {
    options(
        "
        address = '123'
        output = 0
        address2 = '123'
        output2 = 1
        output_type = 'Two direction'
        timeout = 10.0
        timeout2 = 10.0
        ",
    )
}

#[tokio::test(start_paused = true)]
async fn should_wire_mixed_panel_on_one_hub() {
    let bus = Arc::new(RecordingBus::default());
    let hub = Hub::new(Arc::clone(&bus) as Arc<dyn PanelBus>);
    let state_bus = StateBus::new(64);

    let cover = Cover::setup(&hub, &cover_options(), Arc::clone(&state_bus) as _)
        .expect("cover should set up");
    let switch = Switch::setup(
        &hub,
        &options("address = '123'\noutput = 2"),
        Arc::clone(&state_bus) as _,
    )
    .expect("switch should set up");
    let sensor = BinarySensor::setup(
        &hub,
        &options("address = '123'\ninput = 0"),
        Arc::clone(&state_bus) as _,
    )
    .expect("binary sensor should set up");

    assert_eq!(cover.unique_id(), "123.0.1");
    assert_eq!(switch.unique_id(), "123.2");
    assert_eq!(sensor.unique_id(), "123.0");

    switch.turn_on().expect("switch should turn on");
    let resource = OutputConfig::parse_on_off(&options("address = '123'\noutput = 2"))
        .unwrap()
        .resource()
        .unwrap();
    assert_eq!(bus.last_level(resource), Some(255));

    cover.shutdown().await;
    switch.shutdown();
    sensor.shutdown().await;

    let config = TwoWayConfig::parse(&cover_options()).unwrap();
    assert!(hub.is_available(config.open.resource().unwrap()));
    assert!(hub.is_available(config.close.unwrap().resource().unwrap()));
    assert!(hub.is_available(resource));
}

#[tokio::test(start_paused = true)]
async fn should_broadcast_cover_movement() {
    let bus = Arc::new(RecordingBus::default());
    let hub = Hub::new(bus as Arc<dyn PanelBus>);
    let state_bus = StateBus::new(64);
    let mut changes = state_bus.subscribe();

    let cover = Cover::setup(&hub, &cover_options(), Arc::clone(&state_bus) as _)
        .expect("cover should set up");

    cover.close().await.expect("close should succeed");

    // One signal when the movement starts, one when it settles.
    assert_eq!(changes.recv().await.unwrap().unique_id, "123.0.1");
    assert_eq!(changes.recv().await.unwrap().unique_id, "123.0.1");
    assert!(cover.is_closed());

    cover.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn should_supersede_movement_across_the_stack() {
    let bus = Arc::new(RecordingBus::default());
    let hub = Hub::new(bus as Arc<dyn PanelBus>);
    let state_bus = StateBus::new(64);

    let cover = Cover::setup(&hub, &cover_options(), Arc::clone(&state_bus) as _)
        .expect("cover should set up");

    tokio::join!(
        async {
            cover.close().await.expect("close should succeed");
        },
        async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            cover.stop().await;
        },
    );

    assert_eq!(cover.current_position(), 70);
    cover.shutdown().await;
}

#[tokio::test]
async fn should_reject_two_entities_on_one_output() {
    let bus = Arc::new(RecordingBus::default());
    let hub = Hub::new(bus as Arc<dyn PanelBus>);
    let state_bus = StateBus::new(64);

    let _switch = Switch::setup(
        &hub,
        &options("address = '123'\noutput = 4"),
        Arc::clone(&state_bus) as _,
    )
    .expect("first claim should succeed");

    let err = Light::setup(
        &hub,
        &options("address = '123'\noutput = 4"),
        Arc::clone(&state_bus) as Arc<dyn StateNotifier>,
    )
    .expect_err("second claim should conflict");

    let IoPanelError::Conflict(conflict) = err else {
        panic!("expected conflict, got {err:?}");
    };
    assert_eq!(conflict.resource, "IO Output=0x123/4");
}
