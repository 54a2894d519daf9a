/// Main clock of the board.
const CPU_HZ: u64 = 16_000_000;

/// Compare match value that makes a CTC mode timer fire every `period_us` with the given clock
/// prescaler.
///
/// Formula: `CPU_HZ / prescaler * period_us / 1_000_000 - 1`
///
/// Periods outside of what a 16 bit compare register can count are clamped.
#[allow(clippy::cast_possible_truncation)]
pub const fn compare_value(prescaler: u64, period_us: u64) -> u16 {
    let ticks = CPU_HZ / prescaler * period_us / 1_000_000;

    if ticks == 0 {
        0
    } else if ticks > 1 << 16 {
        u16::MAX
    } else {
        (ticks - 1) as u16
    }
}
