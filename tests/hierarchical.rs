//! Two composite parents and a flat sibling.
//!
//! ```text
//! ParentAb { A, B }   ParentC { C }   D
//! ```
//!
//! Run hooks propagate to their parent; a requested transition stops the
//! bubbling. Each hook records the bit pattern it observes before adding its own bit.

use arbor::{state_enum, Handle, Machine, Outcome};

state_enum! {
    enum Node {
        ParentAb,
        ParentC,
        A,
        B,
        C,
        D,
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Hook {
    Entry,
    Run,
    Exit,
}

const EXPECTED: [u32; 15] = [
    0x00,   // ParentAb entry
    0x01,   // A entry
    0x03,   // A run
    0x07,   // ParentAb run
    0x0f,   // A exit
    0x1f,   // B entry
    0x3f,   // B run
    0x7f,   // B exit
    0xff,   // ParentAb exit
    0x1ff,  // ParentC entry
    0x3ff,  // C entry
    0x7ff,  // C run
    0xfff,  // C exit
    0x1fff, // ParentC exit
    0x3fff, // D entry
];

const CYCLES: usize = 3;

/// Bit set by each hook once it has run.
fn bit(state: Node, hook: Hook) -> u32 {
    let index = match (state, hook) {
        (Node::ParentAb, Hook::Entry) => 0,
        (Node::A, Hook::Entry) => 1,
        (Node::A, Hook::Run) => 2,
        (Node::ParentAb, Hook::Run) => 3,
        (Node::A, Hook::Exit) => 4,
        (Node::B, Hook::Entry) => 5,
        (Node::B, Hook::Run) => 6,
        (Node::B, Hook::Exit) => 7,
        (Node::ParentAb, Hook::Exit) => 8,
        (Node::ParentC, Hook::Entry) => 9,
        (Node::C, Hook::Entry) => 10,
        (Node::C, Hook::Run) => 11,
        (Node::C, Hook::Exit) => 12,
        (Node::ParentC, Hook::Exit) => 13,
        _ => return 0,
    };
    1 << index
}

#[derive(Default)]
struct Trace {
    bits: u32,
    seen: Vec<u32>,
    stop_at: Option<(Node, Hook)>,
    unexpected: Vec<&'static str>,
}

impl Trace {
    fn stopping_at(state: Node, hook: Hook) -> Self {
        Self {
            stop_at: Some((state, hook)),
            ..Self::default()
        }
    }
}

fn visit(m: &mut Handle<'_, Node, Trace>, state: Node, hook: Hook) -> bool {
    assert_eq!(m.executing_state(), Some(state));
    let trace = m.context_mut();
    trace.seen.push(trace.bits);
    if trace.stop_at == Some((state, hook)) {
        m.terminate(-1);
        return false;
    }
    m.context_mut().bits |= bit(state, hook);
    true
}

fn run(trace: Trace) -> Machine<Node, Trace> {
    let mut machine = Machine::new(trace);
    machine
        .start(Node::A, |root| {
            root.state(Node::ParentAb)?
                .on_entry(|m| {
                    visit(m, Node::ParentAb, Hook::Entry);
                })
                .on_run(|m, _| {
                    if visit(m, Node::ParentAb, Hook::Run) {
                        m.transition(Node::B).unwrap();
                    }
                    Outcome::Propagate
                })
                .on_exit(|m| {
                    visit(m, Node::ParentAb, Hook::Exit);
                })
                .with(|ab| {
                    ab.state(Node::A)?
                        .on_entry(|m| {
                            visit(m, Node::A, Hook::Entry);
                        })
                        .on_run(|m, _| {
                            visit(m, Node::A, Hook::Run);
                            Outcome::Propagate
                        })
                        .on_exit(|m| {
                            visit(m, Node::A, Hook::Exit);
                        });
                    ab.state(Node::B)?
                        .on_entry(|m| {
                            visit(m, Node::B, Hook::Entry);
                        })
                        .on_run(|m, _| {
                            if visit(m, Node::B, Hook::Run) {
                                m.transition(Node::C).unwrap();
                            }
                            Outcome::Propagate
                        })
                        .on_exit(|m| {
                            visit(m, Node::B, Hook::Exit);
                        });
                    Ok(())
                })?;

            root.state(Node::ParentC)?
                .on_entry(|m| {
                    visit(m, Node::ParentC, Hook::Entry);
                })
                .on_run(|m, _| {
                    m.context_mut().unexpected.push("ParentC run");
                    Outcome::Propagate
                })
                .on_exit(|m| {
                    visit(m, Node::ParentC, Hook::Exit);
                })
                .with(|pc| {
                    pc.state(Node::C)?
                        .on_entry(|m| {
                            visit(m, Node::C, Hook::Entry);
                        })
                        .on_run(|m, _| {
                            visit(m, Node::C, Hook::Run);
                            m.transition(Node::D).unwrap();
                            Outcome::Propagate
                        })
                        .on_exit(|m| {
                            visit(m, Node::C, Hook::Exit);
                        });
                    Ok(())
                })?;

            root.state(Node::D)?
                .on_entry(|m| {
                    visit(m, Node::D, Hook::Entry);
                })
                .on_run(|_, _| Outcome::Propagate);
            Ok(())
        })
        .unwrap();

    for _ in 0..CYCLES {
        machine.tick().unwrap();
        if machine.is_terminated() {
            break;
        }
    }
    machine
}

fn assert_reached(trace: &Trace, index: usize) {
    assert_eq!(trace.seen, EXPECTED[..=index]);
    assert_eq!(trace.bits, EXPECTED[index]);
    assert!(trace.unexpected.is_empty(), "{:?}", trace.unexpected);
}

#[test]
fn hierarchical_transitions() {
    let machine = run(Trace::default());

    assert_reached(machine.context(), 14);
    assert_eq!(machine.current_state(), Some(Node::D));
}

#[test]
fn parent_entry_termination() {
    let machine = run(Trace::stopping_at(Node::ParentAb, Hook::Entry));

    assert_reached(machine.context(), 0);
    assert!(machine.is_terminated());
}

#[test]
fn parent_run_termination() {
    let machine = run(Trace::stopping_at(Node::ParentAb, Hook::Run));

    assert_reached(machine.context(), 3);
    assert_eq!(machine.current_state(), Some(Node::A));
}

#[test]
fn parent_exit_termination() {
    let machine = run(Trace::stopping_at(Node::ParentAb, Hook::Exit));

    assert_reached(machine.context(), 8);
    assert!(machine.is_terminated());
}

#[test]
fn child_entry_termination() {
    let machine = run(Trace::stopping_at(Node::A, Hook::Entry));

    assert_reached(machine.context(), 1);
}

#[test]
fn child_run_termination() {
    let machine = run(Trace::stopping_at(Node::B, Hook::Run));

    assert_reached(machine.context(), 6);
    assert_eq!(machine.current_state(), Some(Node::B));
}

#[test]
fn child_exit_termination() {
    let machine = run(Trace::stopping_at(Node::C, Hook::Exit));

    assert_reached(machine.context(), 12);
    assert_eq!(machine.terminate_value(), Some(-1));
}
