//! Scoreboard demo: default, counted and skip-then-fire registrations.
//!
//! Run with delivery tracing:
//! ```sh
//! RUST_LOG=debug cargo run --example score
//! ```

use evoke::{ContextId, Dispatcher};

fn main() -> Result<(), evoke::EmitError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let bus: Dispatcher<u32> = Dispatcher::new();

    let board = ContextId::next();
    bus.on("score", board, |points: &u32| {
        println!("[board] +{points}");
    });

    let replay = ContextId::next();
    bus.once("score", replay, |points: &u32| {
        println!("[replay] first points of the match: +{points}");
    });

    let announcer = ContextId::next();
    bus.at(
        "score",
        announcer,
        |points: &u32| println!("[announcer] the crowd is on its feet! +{points}"),
        3,
    );

    for points in [5, 10, 15, 20] {
        bus.emit("score", &points)?;
    }

    // The announcer leaves; the board keeps going.
    bus.off(&["score"], announcer);
    bus.emit("score", &25)?;

    Ok(())
}
