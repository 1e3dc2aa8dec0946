//! Device Control
//!
//! This example drives a small device through power, task and error states.
//!
//! Key concepts:
//! - Composite state (On) drilling into its initial child (Idle)
//! - Parent run hooks handling events their children propagate
//! - Exit hooks running child first, entry hooks parent first
//! - Transition requests, from hooks or the caller, applied by the next tick
//!
//! Run with: cargo run --example device

use arbor::{state_enum, ConfigError, Machine, Outcome, Scope, StateId};

state_enum! {
    enum Device {
        Off,
        On,
        Idle,
        Working,
        Failed,
    }
}

#[derive(Debug, Default)]
struct DeviceData {
    battery_low: bool,
    task_running: bool,
    error_occurred: bool,
    task_progress: u32,
}

fn configure(root: &mut Scope<'_, Device, DeviceData, ()>) -> Result<(), ConfigError> {
    root.on_entry(|_| println!("[DEVICE] Entry: initializing device"));

    root.state(Device::Off)?
        .on_entry(|_| println!("[OFF] Entry: device powered off"));

    root.state(Device::On)?
        .initial(Device::Idle)
        .on_entry(|_| println!("[ON] Entry: power on sequence started"))
        .on_run(|m, _| {
            print!("  [ON] Checking battery level... ");
            if m.context().battery_low {
                println!("LOW!");
                println!("  [ON] Initiating emergency shutdown");
                m.transition(Device::Off).ok();
                return Outcome::Handled;
            }
            println!("OK");
            Outcome::Propagate
        })
        .on_exit(|_| println!("[ON] Exit: shutting down power"))
        .with(|on| {
            on.state(Device::Idle)?
                .on_entry(|_| println!("[IDLE] Entry: ready, waiting for commands"))
                .on_exit(|_| println!("[IDLE] Exit: leaving idle state"));

            on.state(Device::Working)?
                .on_entry(|m| {
                    println!("[WORKING] Entry: task execution started");
                    let data = m.context_mut();
                    data.task_running = true;
                    data.task_progress = 0;
                })
                .on_run(|m, _| {
                    let data = m.context_mut();
                    if !data.task_running {
                        return Outcome::Propagate;
                    }
                    println!("  [WORKING] Task progress: {}%", data.task_progress);
                    data.task_progress += 25;
                    if data.task_progress < 100 {
                        return Outcome::Propagate;
                    }
                    println!("  [WORKING] Task completed!");
                    data.task_running = false;
                    m.transition(Device::Idle).ok();
                    Outcome::Handled
                })
                .on_exit(|m| {
                    println!("[WORKING] Exit: stopping task");
                    m.context_mut().task_running = false;
                });

            on.state(Device::Failed)?
                .name("Error")
                .on_entry(|_| println!("[ERROR] Entry: error handling mode activated"))
                .on_run(|_, _| {
                    println!("  [ERROR] Attempting recovery...");
                    Outcome::Propagate
                })
                .on_exit(|m| {
                    println!("[ERROR] Exit: resetting error state");
                    m.context_mut().error_occurred = false;
                });
            Ok(())
        })
}

fn scenario(title: &str) {
    println!();
    println!("------------------------------------------------");
    println!("Scenario: {}", title);
    println!("------------------------------------------------");
    println!();
}

fn show(machine: &Machine<Device, DeviceData>) {
    let path: Vec<&str> = machine
        .current_state()
        .and_then(|state| machine.tree().lookup(state))
        .map(|leaf| {
            let tree = machine.tree();
            let mut names: Vec<&str> = arbor::core::topology::ancestors(tree, leaf)
                .map(|node| tree.node(node).name())
                .collect();
            names.reverse();
            names
        })
        .unwrap_or_default();
    println!("  Current State: {}", path.join("/"));
}

/// Queue a transition and tick once so the machine applies it.
fn request(machine: &mut Machine<Device, DeviceData>, target: Device) -> Result<(), arbor::Error> {
    machine.transition(target)?;
    machine.tick()?;
    Ok(())
}

fn main() -> Result<(), arbor::Error> {
    println!("=== Hierarchical State Machine: Device Control ===");

    let mut machine: Machine<Device, DeviceData> = Machine::new(DeviceData::default());
    machine.start(Device::Off, configure)?;
    show(&machine);

    scenario("Power on and initial transition");
    println!("[EVENT] Power button pressed\n");
    request(&mut machine, Device::On)?;
    show(&machine);

    scenario("Task execution");
    println!("[EVENT] Start task\n");
    request(&mut machine, Device::Working)?;
    for _ in 0..4 {
        machine.tick()?;
    }
    show(&machine);

    scenario("Event propagation to the parent state");
    request(&mut machine, Device::Working)?;
    machine.context_mut().task_progress = 50;
    println!("\n[EVENT] Battery low detected\n");
    machine.context_mut().battery_low = true;
    machine.tick()?;
    show(&machine);
    machine.context_mut().battery_low = false;

    scenario("Error recovery");
    request(&mut machine, Device::On)?;
    request(&mut machine, Device::Working)?;
    println!("\n[EVENT] Error occurred\n");
    machine.context_mut().error_occurred = true;
    request(&mut machine, Device::Failed)?;
    show(&machine);
    println!("\n[EVENT] Reset\n");
    request(&mut machine, Device::Idle)?;
    show(&machine);

    scenario("Hierarchical exit");
    request(&mut machine, Device::Working)?;
    println!("\n[EVENT] Power off\n");
    request(&mut machine, Device::Off)?;
    show(&machine);

    println!("\n=== Transition history ===");
    for record in machine.history().iter() {
        let from = record.from.as_ref().map_or("(start)", |state| state.name());
        println!("  step {}: {} -> {}", record.step, from, record.to.name());
    }

    Ok(())
}
