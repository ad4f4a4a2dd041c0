use crate::{algorithm::wave::Wave, spatial::symmetry::Direction};

/// Propagate pending removals until the wave is arc-consistent
///
/// Each event `(cell, tile)` withdraws one unit of support from every
/// partner of `tile` still present in each neighbor. A partner whose support
/// from that side reaches zero is banned, which enqueues a further event.
///
/// Returns `false` if some domain emptied. The queue is discarded in that
/// case and the wave is left as it stood at the moment of contradiction.
pub fn drain(wave: &mut Wave) -> bool {
    if wave.is_contradiction() {
        wave.clear_queue();
        return false;
    }

    let rules = wave.rules().clone();

    while let Some((cell, tile)) = wave.pop_event() {
        for direction in Direction::ALL {
            let Some(neighbor) = wave.neighbor(cell, direction) else {
                continue;
            };
            // The neighbor sees this cell from the opposite side
            let incoming = direction.opposite();

            for &partner in rules.partners(direction, tile) {
                if wave.decrement_support(neighbor, partner, incoming) == Some(0) {
                    wave.ban(neighbor, partner);
                    if wave.is_contradiction() {
                        wave.clear_queue();
                        return false;
                    }
                }
            }
        }
    }

    true
}

/// Ban every tile of a cell except `keep`, then propagate
///
/// Returns `false` on contradiction.
pub fn restrict_to(wave: &mut Wave, cell: usize, keep: usize) -> bool {
    let others: Vec<usize> = wave
        .domain(cell)
        .map(|domain| domain.iter().filter(|&tile| tile != keep).collect())
        .unwrap_or_default();

    for tile in others {
        wave.ban(cell, tile);
    }
    drain(wave)
}
