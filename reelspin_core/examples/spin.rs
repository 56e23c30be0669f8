use reelspin_core::{GameConfig, MachineEvent, SlotMachine};
use std::time::Duration;

fn main() {
    // One spin at max bet, driven on the virtual clock
    let mut machine = SlotMachine::seeded(GameConfig::default(), 1);
    machine.set_max_bet().expect("idle machine");
    machine.spin().expect("enough credits");
    while machine.is_spinning() {
        for event in machine.advance(Duration::from_millis(100)) {
            if let MachineEvent::ReelStopped { reel } = event {
                let view = machine.view();
                let column: Vec<String> =
                    view.visible[reel].iter().map(|s| s.to_string()).collect();
                println!("reel {} stopped: {}", reel, column.join(" "));
            }
        }
    }
    let view = machine.view();
    println!(
        "credits={} message={} winners={:?}",
        view.credits,
        view.message.unwrap_or_default(),
        view.winning_positions
    );
}
