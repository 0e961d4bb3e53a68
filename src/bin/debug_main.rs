//! A line-based driver for the engine, printing the field as text after every action.

use visweeper::{field::Field, Minesweeper, MinesweeperAction, MinesweeperStatus};

fn get_action() -> Option<MinesweeperAction> {
    println!("Enter the desired action and the target cell's coordinates (e.g. `f 3,5` to flag the 6th cell on the 4th line, `w` to win):");

    let mut input = String::new();
    std::io::stdin().read_line(&mut input).ok()?;

    let words = input.split_whitespace().collect::<Vec<&str>>();

    let (action, cell_position) = match words.as_slice() {
        ["w"] => return Some(MinesweeperAction::ForceWin),
        [action, cell_position] => (*action, *cell_position),
        _ => return None,
    };

    let cell_position = cell_position
        .trim()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect::<Vec<u8>>();

    let cell_position = (*cell_position.first()?, *cell_position.get(1)?);

    match action {
        "r" => Some(MinesweeperAction::Reveal(cell_position)),
        "f" => Some(MinesweeperAction::Flag(cell_position)),
        _ => None,
    }
}

fn print_field(field: &Field) {
    println!("DISPLAY:\n{}", field);
    // println!("DEBUG:\n{:?}", field);
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let mut game = Minesweeper::new(9, 24, 18)?;

    print_field(game.get_field());

    loop {
        let Some(action) = get_action() else {
            println!("Incorrect input! Please, try again.");
            continue;
        };

        let status = game.take_action(action);
        print_field(game.get_field());

        if let MinesweeperStatus::End(victory) = status {
            println!("{} in {:?}", if victory { "Victory" } else { "Defeat" }, game.elapsed_time());
            break;
        }

        println!("Flags: {}/{}", game.flags_amount(), game.mines_amount());
    }

    Ok(())
}
