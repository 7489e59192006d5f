#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower build menu ordering and affordability.
//!
//! Options are presented cheapest first. Because the list is sorted by cost,
//! every option up to the most expensive affordable one is affordable, so a
//! single binary search decides which entries are enabled.

use tower_defence_core::TowerKind;

/// Anything that carries a purchase price.
pub trait Priced {
    /// Purchase price in coins.
    fn cost(&self) -> u32;
}

/// One purchasable tower in the build menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildOption {
    kind: TowerKind,
    cost: u32,
}

impl BuildOption {
    /// Creates an option priced from the tower's archetype.
    #[must_use]
    pub const fn new(kind: TowerKind) -> Self {
        Self {
            kind,
            cost: kind.stats().cost,
        }
    }

    /// Tower built when the option is chosen.
    #[must_use]
    pub const fn kind(&self) -> TowerKind {
        self.kind
    }

    /// Display name of the tower.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }
}

impl Priced for BuildOption {
    fn cost(&self) -> u32 {
        self.cost
    }
}

/// Sorts options ascending by cost, keeping the input order of equal costs.
pub fn sort_by_cost<T: Priced>(options: &mut [T]) {
    options.sort_by_key(|option| option.cost());
}

/// Index of the most expensive option the budget covers, if any.
///
/// `sorted` must be ascending by cost.
#[must_use]
pub fn max_affordable_index<T: Priced>(sorted: &[T], budget: u32) -> Option<usize> {
    sorted
        .partition_point(|option| option.cost() <= budget)
        .checked_sub(1)
}

/// Menu entry paired with whether the player can currently afford it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    /// Option shown in this slot.
    pub option: BuildOption,
    /// Whether the option can be bought with the current balance.
    pub enabled: bool,
}

/// Cost-ordered list of every tower archetype.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildMenu {
    options: Vec<BuildOption>,
}

impl BuildMenu {
    /// Builds the menu from the archetypes in catalogue order, then sorts it by cost.
    #[must_use]
    pub fn new() -> Self {
        let mut options: Vec<BuildOption> =
            [TowerKind::Sniper, TowerKind::Shotgun, TowerKind::Bazooka]
                .into_iter()
                .map(BuildOption::new)
                .collect();
        sort_by_cost(&mut options);
        Self { options }
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[BuildOption] {
        &self.options
    }

    /// Options in display order with their affordability for `coins`.
    #[must_use]
    pub fn entries(&self, coins: u32) -> Vec<MenuEntry> {
        let cutoff = max_affordable_index(&self.options, coins);
        self.options
            .iter()
            .enumerate()
            .map(|(index, option)| MenuEntry {
                option: *option,
                enabled: cutoff.is_some_and(|last| index <= last),
            })
            .collect()
    }

    /// Tower chosen from slot `index`, or `None` when the slot is empty or unaffordable.
    #[must_use]
    pub fn choose(&self, index: usize, coins: u32) -> Option<TowerKind> {
        let last = max_affordable_index(&self.options, coins)?;
        if index > last {
            return None;
        }
        self.options.get(index).map(BuildOption::kind)
    }
}

impl Default for BuildMenu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item(&'static str, u32);

    impl Priced for Item {
        fn cost(&self) -> u32 {
            self.1
        }
    }

    #[test]
    fn cutoff_finds_most_expensive_affordable_option() {
        let sorted = [Item("a", 50), Item("b", 100), Item("c", 150)];
        assert_eq!(max_affordable_index(&sorted, 120), Some(1));
        assert_eq!(max_affordable_index(&sorted, 40), None);
        assert_eq!(max_affordable_index(&sorted, 150), Some(2));
        assert_eq!(max_affordable_index(&sorted, 50), Some(0));
        assert_eq!(max_affordable_index::<Item>(&[], 1_000), None);
    }

    #[test]
    fn sorting_is_stable_on_equal_costs() {
        let mut items = vec![Item("x", 100), Item("y", 50), Item("z", 100), Item("w", 50)];
        sort_by_cost(&mut items);
        assert_eq!(
            items,
            vec![Item("y", 50), Item("w", 50), Item("x", 100), Item("z", 100)]
        );
    }

    #[test]
    fn menu_lists_cheapest_first() {
        let names: Vec<&str> = BuildMenu::new()
            .options()
            .iter()
            .map(BuildOption::name)
            .collect();
        assert_eq!(names, vec!["Bazooka", "Sniper", "Shotgun"]);
    }

    #[test]
    fn entries_disable_unaffordable_options() {
        let enabled: Vec<bool> = BuildMenu::new()
            .entries(120)
            .iter()
            .map(|entry| entry.enabled)
            .collect();
        assert_eq!(enabled, vec![true, true, false]);
    }

    #[test]
    fn choosing_unaffordable_or_missing_slot_yields_nothing() {
        let menu = BuildMenu::new();
        assert_eq!(menu.choose(1, 120), Some(TowerKind::Sniper));
        assert_eq!(menu.choose(2, 120), None);
        assert_eq!(menu.choose(0, 10), None);
        assert_eq!(menu.choose(7, 1_000), None);
    }
}
