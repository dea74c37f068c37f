/// Which of the well-known branches were asked for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BranchFlags {
    pub stable: bool,
    pub testing: bool,
    pub unstable: bool,
    pub archlinux: bool,
}

impl BranchFlags {
    /// (flag, branch name), in display order
    fn table(&self) -> [(bool, &'static str); 4] {
        [
            (self.stable, "stable"),
            (self.testing, "testing"),
            (self.unstable, "unstable"),
            (self.archlinux, "archlinux"),
        ]
    }

    pub fn selected(&self) -> Vec<&'static str> {
        self.table()
            .into_iter()
            .filter(|(flag, _)| *flag)
            .map(|(_, name)| name)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.table().iter().filter(|(flag, _)| *flag).count()
    }

    /// Raise the flag of the branch starting with the same letter as `branch`.
    /// Returns false if no branch matched.
    pub fn set(&mut self, branch: &str) -> bool {
        let flag = match branch.chars().next() {
            Some('s') => &mut self.stable,
            Some('t') => &mut self.testing,
            Some('u') => &mut self.unstable,
            Some('a') => &mut self.archlinux,
            _ => return false,
        };
        *flag = true;
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn selection_order() {
        let mut flags = BranchFlags::default();
        assert!(flags.selected().is_empty());
        assert!(flags.set("unstable"));
        assert!(flags.set("s"));
        assert!(!flags.set(""));
        assert!(!flags.set("xyz"));
        assert_eq!(flags.selected(), vec!["stable", "unstable"]);
        assert_eq!(flags.count(), 2);

        flags.archlinux = true;
        assert_eq!(flags.selected(), vec!["stable", "unstable", "archlinux"]);
    }
}
