use rustc_hash::FxHashMap;

/// Union-find over row indices with path compression and union by rank.
///
/// Elements are tracked lazily: `find` or `union` on an unseen element makes
/// it a singleton root. `order` records first-tracked order so `groups` is
/// reproducible regardless of hash layout.
#[derive(Debug, Default)]
pub struct DisjointSet {
    parent: FxHashMap<usize, usize>,
    rank: FxHashMap<usize, u32>,
    order: Vec<usize>,
}

/// One equivalence class, members in first-tracked order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub root: usize,
    pub members: Vec<usize>,
}

impl DisjointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked elements.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn track(&mut self, x: usize) {
        if !self.parent.contains_key(&x) {
            self.parent.insert(x, x);
            self.order.push(x);
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        self.track(x);

        let mut root = x;
        while self.parent[&root] != root {
            root = self.parent[&root];
        }

        // Compress: relink every node on the walk directly to the root.
        let mut node = x;
        while node != root {
            let next = self.parent[&node];
            self.parent.insert(node, root);
            node = next;
        }

        root
    }

    pub fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return;
        }

        let rank_x = self.rank.get(&root_x).copied().unwrap_or(0);
        let rank_y = self.rank.get(&root_y).copied().unwrap_or(0);

        if rank_x < rank_y {
            self.parent.insert(root_x, root_y);
        } else if rank_x > rank_y {
            self.parent.insert(root_y, root_x);
        } else {
            self.parent.insert(root_y, root_x);
            self.rank.insert(root_x, rank_x + 1);
        }
    }

    pub fn connected(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    /// Collect every tracked element under its root.
    ///
    /// Groups come back in the order their first member was tracked.
    pub fn groups(&mut self) -> Vec<Group> {
        let mut slot_by_root: FxHashMap<usize, usize> = FxHashMap::default();
        let mut groups: Vec<Group> = Vec::new();

        let order = self.order.clone();
        for x in order {
            let root = self.find(x);
            let slot = *slot_by_root.entry(root).or_insert_with(|| {
                groups.push(Group { root, members: Vec::new() });
                groups.len() - 1
            });
            groups[slot].members.push(x);
        }

        groups
    }
}
