/*!
# Split-Findmin Structure

Gabow's recursive partitioned-lists structure. It maintains a partition of
a fixed universe of cost-carrying elements into lists, supporting three
operations: `decrease_cost` on an element, `split` of a list at an
element, and reading the minimum cost of the list containing an element,
all in near-constant amortized time.

The structure is hierarchical. A list at level `i` owns a left-to-right
sequence of *containers*, each holding one of:

- a loose element (a leftover singleton),
- a *singleton superelement* (a block of consecutive elements compressed
  into one cost-carrying crown), or
- a *sublist* of level `i - 1` whose elements are the crowns of
  consecutive superelements.

Superelement sizes at level `i` are `2 * A(i, alpha(i, r))` for the
remaining length `r`, looked up in the precomputed
[`AckermannTable`](crate::core::ackermann::AckermannTable); at most three
elements trail as singletons once no superelement fits. Cost updates
propagate from an element through its superelement chain and sublist
chain to the cost of the top-level list. Splitting dismantles only the
structures on the chain through the split element: the two fragments of
the innermost superelement are re-partitioned (scanning right-to-left for
the left side, left-to-right for the right side, which yields the same
per-level structure with reversed insertion order), while members freed
from outer superelements are patched in as singleton superelements.

Everything lives in arenas indexed by `u32`; back-references are indices,
never owning pointers, and nothing is reclaimed mid-query. Costs are
`i64` widened by the [`INFINITE_COST`] sentinel.
*/

use crate::core::ackermann::AckermannTable;
use crate::core::error::{Result, ThorupError};

/// Cost sentinel standing in for +infinity.
pub const INFINITE_COST: i64 = i64::MAX;

const NIL: u32 = u32::MAX;

/// Handle to an element of the universe, as returned by [`SplitFindmin::add`].
pub type ElementId = u32;

/// Handle to a list of the current partition.
pub type ListId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    /// Compressed into a superelement.
    Super(u32),
    /// Sitting directly in a list container.
    Container(u32),
    /// Not yet initialized, or destroyed by a split.
    Detached,
}

#[derive(Debug, Clone, Copy)]
enum Payload {
    Sentinel,
    /// A loose element (base element in a top-level list, superelement
    /// crown in a sublist).
    Elem(u32),
    /// A singleton superelement, parked outside any sublist.
    Single(u32),
    /// A proper sublist one level down.
    Sub(u32),
}

#[derive(Debug, Clone)]
struct Cell {
    cost: i64,
    /// Caller item for base cells; `NIL` for superelement crowns.
    item: u32,
    /// The superelement this cell crowns; `NIL` for base cells.
    sup: u32,
    prev: u32,
    next: u32,
    parent: Parent,
}

#[derive(Debug, Clone)]
struct SuperRec {
    crown: u32,
    first: u32,
    last: u32,
    level: u32,
}

#[derive(Debug, Clone)]
struct ListRec {
    cost: i64,
    level: u32,
    head: u32,
    tail: u32,
    /// Container in the parent list holding this sublist; `NIL` for
    /// top-level lists.
    parent: u32,
}

#[derive(Debug, Clone)]
struct Container {
    list: u32,
    prev: u32,
    next: u32,
    payload: Payload,
}

/// Gabow's split-findmin structure over a universe of integer-cost
/// elements.
///
/// # Example
///
/// ```rust
/// use thorup::core::splitfindmin::{SplitFindmin, INFINITE_COST};
///
/// let mut sfm = SplitFindmin::new(4, 8);
/// for v in 0..4 {
///     sfm.add(v, INFINITE_COST);
/// }
/// sfm.initialize();
/// sfm.decrease_cost(2, 10).unwrap();
/// assert_eq!(sfm.list_cost(0).unwrap(), 10);
/// let _right = sfm.split(1).unwrap();
/// assert_eq!(sfm.list_cost(0).unwrap(), INFINITE_COST);
/// assert_eq!(sfm.list_cost(2).unwrap(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct SplitFindmin {
    cells: Vec<Cell>,
    supers: Vec<SuperRec>,
    lists: Vec<ListRec>,
    conts: Vec<Container>,
    acker: AckermannTable,
    level: u32,
    n_base: u32,
    initialized: bool,
}

impl SplitFindmin {
    /// Creates an empty structure sized for `universe` elements and
    /// roughly `operations` decrease-cost calls. The pair picks the head
    /// list level through the inverse-Ackermann lookup; levels below 1
    /// are clamped so tiny universes still initialize.
    pub fn new(universe: usize, operations: usize) -> Self {
        let acker = AckermannTable::new(universe.max(4));
        let level = acker
            .inverse(operations, universe)
            .map_or(1, |i| i.max(1)) as u32;
        Self::with_table(universe, level, acker)
    }

    /// Creates a structure with an explicit head list level. Mostly
    /// useful for exercising the deeper recursion on small universes.
    pub fn with_level(universe: usize, level: usize) -> Self {
        let acker = AckermannTable::new(universe.max(4));
        Self::with_table(universe, level.max(1) as u32, acker)
    }

    fn with_table(universe: usize, level: u32, acker: AckermannTable) -> Self {
        Self {
            cells: Vec::with_capacity(universe + universe / 2),
            supers: Vec::new(),
            lists: Vec::new(),
            conts: Vec::new(),
            acker,
            level,
            n_base: 0,
            initialized: false,
        }
    }

    /// The head list level the structure was built with.
    pub fn level(&self) -> usize {
        self.level as usize
    }

    /// Number of elements added so far.
    pub fn len(&self) -> usize {
        self.n_base as usize
    }

    /// Returns true if no elements have been added.
    pub fn is_empty(&self) -> bool {
        self.n_base == 0
    }

    /// Returns true once `initialize` has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Appends an element with the given item and starting cost. Only
    /// valid before [`initialize`](Self::initialize).
    pub fn add(&mut self, item: u32, cost: i64) -> ElementId {
        debug_assert!(!self.initialized, "add after initialize");
        let id = self.cells.len() as u32;
        self.cells.push(Cell {
            cost,
            item,
            sup: NIL,
            prev: NIL,
            next: NIL,
            parent: Parent::Detached,
        });
        self.n_base += 1;
        id
    }

    /// Recursively partitions the element sequence into superelements,
    /// leftover singletons, and sublists, computing every list cost
    /// bottom-up. The whole universe becomes one head list.
    pub fn initialize(&mut self) {
        debug_assert!(!self.initialized, "initialize called twice");
        let base: Vec<u32> = (0..self.n_base).collect();
        let top = self.new_list(self.level);
        if !base.is_empty() {
            let payloads = self.structure_run(&base, self.level, false);
            for p in payloads {
                self.append_payload(top, p);
            }
        }
        self.lists[top as usize].cost = self.scan_cost(top);
        self.initialized = true;
    }

    /// Returns the current cost of an element.
    pub fn cost(&self, e: ElementId) -> i64 {
        self.cells[e as usize].cost
    }

    /// Returns the caller item of an element.
    pub fn item(&self, e: ElementId) -> u32 {
        self.cells[e as usize].item
    }

    /// Returns the minimum cost of the top-level list containing `e`.
    pub fn list_cost(&self, e: ElementId) -> Result<i64> {
        let l = self.top_list_of(e)?;
        Ok(self.lists[l as usize].cost)
    }

    /// Clamps `e`'s cost to `min(current, cost)` and propagates the new
    /// minimum through the containing superelement chain, the sublist
    /// chain, and the enclosing list costs. Returns the top-level list
    /// currently containing `e`. A non-decreasing cost is a no-op.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a negative cost, a cost of
    /// [`INFINITE_COST`], or a handle that is not a base element.
    pub fn decrease_cost(&mut self, e: ElementId, cost: i64) -> Result<ListId> {
        self.check_element(e)?;
        if cost < 0 {
            return Err(ThorupError::invalid_argument(format!(
                "cannot decrease element {} to negative cost {}",
                e, cost
            )));
        }
        if cost == INFINITE_COST {
            return Err(ThorupError::invalid_argument(format!(
                "cannot decrease element {} to infinity",
                e
            )));
        }
        if cost >= self.cells[e as usize].cost {
            return self.top_list_of(e);
        }
        self.cells[e as usize].cost = cost;
        let mut cur = e;
        loop {
            match self.cells[cur as usize].parent {
                Parent::Super(s) => {
                    let crown = self.supers[s as usize].crown;
                    if cost < self.cells[crown as usize].cost {
                        self.cells[crown as usize].cost = cost;
                    }
                    cur = crown;
                }
                Parent::Container(k) => {
                    let mut l = self.conts[k as usize].list;
                    loop {
                        if cost < self.lists[l as usize].cost {
                            self.lists[l as usize].cost = cost;
                        }
                        let parent = self.lists[l as usize].parent;
                        if parent == NIL {
                            return Ok(l);
                        }
                        l = self.conts[parent as usize].list;
                    }
                }
                Parent::Detached => {
                    return Err(ThorupError::internal(format!(
                        "element {} is detached from the structure",
                        cur
                    )));
                }
            }
        }
    }

    /// Splits the top-level list containing `e` into everything up to and
    /// including `e` (a fresh list) and the remainder (which keeps the
    /// existing list record). Returns the remainder.
    ///
    /// Only the structures on the chain through `e` are dismantled: the
    /// two fragments of the superelement containing `e` are
    /// re-partitioned with reversed scan directions, members freed from
    /// outer superelements are re-parked as singleton superelements, and
    /// both sides get their costs recomputed by a container scan.
    pub fn split(&mut self, e: ElementId) -> Result<ListId> {
        self.check_element(e)?;

        // Chain of superelements through e, innermost first, with the
        // member cell the chain passes through at each step.
        let mut chain: Vec<(u32, u32)> = Vec::new();
        let mut cur = e;
        let k0 = loop {
            match self.cells[cur as usize].parent {
                Parent::Super(s) => {
                    chain.push((s, cur));
                    cur = self.supers[s as usize].crown;
                }
                Parent::Container(k) => break k,
                Parent::Detached => {
                    return Err(ThorupError::internal(format!(
                        "element {} is detached from the structure",
                        cur
                    )));
                }
            }
        };

        // Chain of lists from the container's list up to the top.
        let mut list_chain = vec![self.conts[k0 as usize].list];
        loop {
            let l = *list_chain.last().unwrap();
            let parent = self.lists[l as usize].parent;
            if parent == NIL {
                break;
            }
            list_chain.push(self.conts[parent as usize].list);
        }
        let d = chain.len();
        let p = list_chain.len() - 1;
        let top = list_chain[p];

        if d == 0 {
            // e sits loose in the top list: keep everything through its
            // container on the left, the remainder stays in place.
            debug_assert_eq!(p, 0, "base elements only occur in top-level lists");
            let left = self.new_list(self.lists[top as usize].level);
            let stop = self.conts[k0 as usize].next;
            self.move_prefix(top, stop, left);
            self.lists[left as usize].cost = self.scan_cost(left);
            self.lists[top as usize].cost = self.scan_cost(top);
            return Ok(top);
        }

        if !matches!(
            self.conts[k0 as usize].payload,
            Payload::Elem(_) | Payload::Single(_)
        ) {
            return Err(ThorupError::internal(
                "split chain ended at a sentinel or sublist container",
            ));
        }

        // Member runs of every chain superelement, collected before any
        // mutation. For the innermost superelement the cut element stays
        // on the left; for the outer ones the cut member is a destroyed
        // crown and belongs to neither side.
        let mut left_runs: Vec<Vec<u32>> = Vec::with_capacity(d);
        let mut right_runs: Vec<Vec<u32>> = Vec::with_capacity(d);
        for (t, &(s, cut)) in chain.iter().enumerate() {
            let rec = self.supers[s as usize].clone();
            let include_cut = t == 0;
            left_runs.push(self.run_before(cut, rec.first, include_cut));
            right_runs.push(self.run_after(cut, rec.last));
        }

        // Destroy the chain superelements; their crowns leave the
        // structure for good.
        for &(s, _) in &chain {
            let crown = self.supers[s as usize].crown;
            self.cells[crown as usize].parent = Parent::Detached;
        }

        let top_level = self.lists[top as usize].level;
        let mut left_lists: Vec<Option<u32>> = vec![None; p + 1];
        for t in 0..=p {
            // The chain superelement whose members are elements of the
            // list at this depth. The superelement directly containing e
            // always sits at the top; each step down the chain descends
            // one list level, so depth t hosts chain super p + 1 - t
            // (1-based), when that index exists.
            let sup_index = p + 1 - t;

            let cut_cont = if t == 0 {
                k0
            } else {
                self.lists[list_chain[t - 1] as usize].parent
            };

            // Left side: fresh list taking the prefix before the cut.
            let level = self.lists[list_chain[t] as usize].level;
            let left = self.new_list(level);
            self.move_prefix(list_chain[t], cut_cont, left);

            // The cut container either disappears (it held a destroyed
            // crown) or is rewired to carry the left fragment of the
            // deeper list.
            self.unlink_container(cut_cont);
            if t > 0 {
                if let Some(deep_left) = left_lists[t - 1] {
                    self.conts[cut_cont as usize].payload = Payload::Sub(deep_left);
                    self.conts[cut_cont as usize].list = left;
                    self.lists[deep_left as usize].parent = cut_cont;
                    self.relink_at_tail(left, cut_cont);
                }
            }

            // Right side: the original list keeps the suffix; splice in a
            // container for the deeper remainder where the cut was.
            if t > 0 {
                let deep_right = list_chain[t - 1];
                if !self.list_is_empty(deep_right) {
                    self.prepend_payload(list_chain[t], Payload::Sub(deep_right));
                }
            }

            if (1..=d).contains(&sup_index) {
                let (s, _) = chain[sup_index - 1];
                let sup_level = self.supers[s as usize].level;
                if sup_index == 1 {
                    // The superelement containing e itself: re-partition
                    // both fragments, head-first on the left, tail-first
                    // on the right.
                    debug_assert_eq!(sup_level, top_level);
                    let frag = left_runs[0].clone();
                    for payload in self.structure_run(&frag, sup_level, true) {
                        self.append_payload(left, payload);
                    }
                    let frag = right_runs[0].clone();
                    let payloads = self.structure_run(&frag, sup_level, false);
                    self.prepend_payloads(list_chain[t], payloads);
                } else {
                    // Members freed from an outer superelement re-enter
                    // their list as singleton superelements.
                    for &m in &left_runs[sup_index - 1] {
                        let ms = self.cells[m as usize].sup;
                        self.append_payload(left, Payload::Single(ms));
                    }
                    let singles: Vec<Payload> = right_runs[sup_index - 1]
                        .iter()
                        .map(|&m| Payload::Single(self.cells[m as usize].sup))
                        .collect();
                    self.prepend_payloads(list_chain[t], singles);
                }
            }

            if self.list_is_empty(left) {
                left_lists[t] = None;
            } else {
                self.lists[left as usize].cost = self.scan_cost(left);
                left_lists[t] = Some(left);
            }
            let cost = self.scan_cost(list_chain[t]);
            self.lists[list_chain[t] as usize].cost = cost;
        }

        Ok(top)
    }

    // ------------------------------------------------------------------
    // Structure building
    // ------------------------------------------------------------------

    /// Partitions a run of cells at the given level into superelements
    /// plus trailing singletons, nesting two or more superelements into a
    /// sublist one level down. Returns the payloads in left-to-right
    /// order. `from_head` scans right-to-left, which yields the same
    /// per-level structure with reversed insertion order.
    fn structure_run(&mut self, run: &[u32], level: u32, from_head: bool) -> Vec<Payload> {
        debug_assert!(level >= 1);
        let mut sups: Vec<u32> = Vec::new();
        let singles: Vec<u32>;
        if from_head {
            let mut end = run.len();
            while let Some(size) = self.super_size(level, end) {
                let s = self.make_super(&run[end - size..end], level);
                sups.push(s);
                end -= size;
            }
            sups.reverse();
            singles = run[..end].to_vec();
        } else {
            let mut pos = 0;
            while let Some(size) = self.super_size(level, run.len() - pos) {
                let s = self.make_super(&run[pos..pos + size], level);
                sups.push(s);
                pos += size;
            }
            singles = run[pos..].to_vec();
        }

        let group: Vec<Payload> = if sups.len() >= 2 && level >= 2 {
            let sub = self.new_list(level - 1);
            let crowns: Vec<u32> = sups.iter().map(|&s| self.supers[s as usize].crown).collect();
            let inner = self.structure_run(&crowns, level - 1, from_head);
            for payload in inner {
                self.append_payload(sub, payload);
            }
            self.lists[sub as usize].cost = self.scan_cost(sub);
            vec![Payload::Sub(sub)]
        } else {
            sups.iter().map(|&s| Payload::Single(s)).collect()
        };

        let mut payloads = Vec::with_capacity(group.len() + singles.len());
        if from_head {
            payloads.extend(singles.iter().map(|&c| Payload::Elem(c)));
            payloads.extend(group);
        } else {
            payloads.extend(group);
            payloads.extend(singles.iter().map(|&c| Payload::Elem(c)));
        }
        payloads
    }

    /// Size of the next superelement for `remaining` cells at `level`, or
    /// `None` when only singletons (at most three) are left.
    fn super_size(&self, level: u32, remaining: usize) -> Option<usize> {
        if remaining < 4 {
            return None;
        }
        let j = self.acker.inverse(level as usize, remaining)?;
        let a = self.acker.value(level as usize, j)?;
        Some((2 * a) as usize)
    }

    fn make_super(&mut self, members: &[u32], level: u32) -> u32 {
        debug_assert!(!members.is_empty());
        let mut min = INFINITE_COST;
        for pair in members.windows(2) {
            self.cells[pair[0] as usize].next = pair[1];
            self.cells[pair[1] as usize].prev = pair[0];
        }
        for &m in members {
            min = min.min(self.cells[m as usize].cost);
        }
        let crown = self.cells.len() as u32;
        let s = self.supers.len() as u32;
        self.cells.push(Cell {
            cost: min,
            item: NIL,
            sup: s,
            prev: NIL,
            next: NIL,
            parent: Parent::Detached,
        });
        self.supers.push(SuperRec {
            crown,
            first: members[0],
            last: *members.last().unwrap(),
            level,
        });
        for &m in members {
            self.cells[m as usize].parent = Parent::Super(s);
        }
        s
    }

    // ------------------------------------------------------------------
    // Container and list plumbing
    // ------------------------------------------------------------------

    fn new_list(&mut self, level: u32) -> u32 {
        let l = self.lists.len() as u32;
        let head = self.conts.len() as u32;
        let tail = head + 1;
        self.conts.push(Container {
            list: l,
            prev: NIL,
            next: tail,
            payload: Payload::Sentinel,
        });
        self.conts.push(Container {
            list: l,
            prev: head,
            next: NIL,
            payload: Payload::Sentinel,
        });
        self.lists.push(ListRec {
            cost: INFINITE_COST,
            level,
            head,
            tail,
            parent: NIL,
        });
        l
    }

    fn link(&mut self, a: u32, b: u32) {
        self.conts[a as usize].next = b;
        self.conts[b as usize].prev = a;
    }

    fn list_is_empty(&self, l: u32) -> bool {
        let head = self.lists[l as usize].head;
        self.conts[head as usize].next == self.lists[l as usize].tail
    }

    fn alloc_container(&mut self, list: u32, payload: Payload) -> u32 {
        let c = self.conts.len() as u32;
        self.conts.push(Container {
            list,
            prev: NIL,
            next: NIL,
            payload,
        });
        self.wire_payload(c, payload);
        c
    }

    fn wire_payload(&mut self, c: u32, payload: Payload) {
        match payload {
            Payload::Elem(cell) => self.cells[cell as usize].parent = Parent::Container(c),
            Payload::Single(s) => {
                let crown = self.supers[s as usize].crown;
                self.cells[crown as usize].parent = Parent::Container(c);
            }
            Payload::Sub(l) => self.lists[l as usize].parent = c,
            Payload::Sentinel => {}
        }
    }

    /// Appends a payload container just before the tail sentinel.
    fn append_payload(&mut self, list: u32, payload: Payload) -> u32 {
        let c = self.alloc_container(list, payload);
        let tail = self.lists[list as usize].tail;
        let prev = self.conts[tail as usize].prev;
        self.link(prev, c);
        self.link(c, tail);
        c
    }

    /// Inserts a payload container just after the head sentinel.
    fn prepend_payload(&mut self, list: u32, payload: Payload) -> u32 {
        let c = self.alloc_container(list, payload);
        let head = self.lists[list as usize].head;
        let next = self.conts[head as usize].next;
        self.link(head, c);
        self.link(c, next);
        c
    }

    /// Inserts payloads after the head sentinel, preserving their order.
    fn prepend_payloads(&mut self, list: u32, payloads: Vec<Payload>) {
        let mut anchor = self.lists[list as usize].head;
        for payload in payloads {
            let c = self.alloc_container(list, payload);
            let next = self.conts[anchor as usize].next;
            self.link(anchor, c);
            self.link(c, next);
            anchor = c;
        }
    }

    /// Detaches `c` from its list sequence; the record itself stays in
    /// the arena.
    fn unlink_container(&mut self, c: u32) {
        let prev = self.conts[c as usize].prev;
        let next = self.conts[c as usize].next;
        self.link(prev, next);
        self.conts[c as usize].prev = NIL;
        self.conts[c as usize].next = NIL;
    }

    /// Re-links an already-allocated container before the tail sentinel
    /// of `list`.
    fn relink_at_tail(&mut self, list: u32, c: u32) {
        let tail = self.lists[list as usize].tail;
        let prev = self.conts[tail as usize].prev;
        self.link(prev, c);
        self.link(c, tail);
    }

    /// Moves the containers of `from` strictly before `stop` into `to`
    /// (appending), re-labeling their list field. `stop` stays behind.
    fn move_prefix(&mut self, from: u32, stop: u32, to: u32) {
        let head = self.lists[from as usize].head;
        let first = self.conts[head as usize].next;
        if first == stop {
            return;
        }
        let last = self.conts[stop as usize].prev;
        self.link(head, stop);

        let tail = self.lists[to as usize].tail;
        let prev = self.conts[tail as usize].prev;
        self.link(prev, first);
        self.link(last, tail);

        let mut c = first;
        loop {
            self.conts[c as usize].list = to;
            if c == last {
                break;
            }
            c = self.conts[c as usize].next;
        }
    }

    /// Minimum over the containers of `l`: loose elements, singleton
    /// superelement crowns, and sublist costs.
    fn scan_cost(&self, l: u32) -> i64 {
        let mut min = INFINITE_COST;
        let mut c = self.conts[self.lists[l as usize].head as usize].next;
        let tail = self.lists[l as usize].tail;
        while c != tail {
            let value = match self.conts[c as usize].payload {
                Payload::Elem(cell) => self.cells[cell as usize].cost,
                Payload::Single(s) => self.cells[self.supers[s as usize].crown as usize].cost,
                Payload::Sub(sub) => self.lists[sub as usize].cost,
                Payload::Sentinel => INFINITE_COST,
            };
            min = min.min(value);
            c = self.conts[c as usize].next;
        }
        min
    }

    // ------------------------------------------------------------------
    // Chain walking
    // ------------------------------------------------------------------

    fn top_list_of(&self, e: u32) -> Result<u32> {
        let mut cur = e;
        loop {
            match self.cells[cur as usize].parent {
                Parent::Super(s) => cur = self.supers[s as usize].crown,
                Parent::Container(k) => {
                    let mut l = self.conts[k as usize].list;
                    while self.lists[l as usize].parent != NIL {
                        l = self.conts[self.lists[l as usize].parent as usize].list;
                    }
                    return Ok(l);
                }
                Parent::Detached => {
                    return Err(ThorupError::internal(format!(
                        "element {} is detached from the structure",
                        cur
                    )));
                }
            }
        }
    }

    /// Collects the member run from `cut` back to `first`, walking the
    /// backward links, and returns it in left-to-right order.
    fn run_before(&self, cut: u32, first: u32, include_cut: bool) -> Vec<u32> {
        let mut run = Vec::new();
        if include_cut {
            run.push(cut);
        }
        let mut c = cut;
        while c != first {
            c = self.cells[c as usize].prev;
            run.push(c);
        }
        run.reverse();
        run
    }

    /// Collects the member run strictly after `cut` through `last`.
    fn run_after(&self, cut: u32, last: u32) -> Vec<u32> {
        let mut run = Vec::new();
        if cut == last {
            return run;
        }
        let mut c = self.cells[cut as usize].next;
        loop {
            run.push(c);
            if c == last {
                break;
            }
            c = self.cells[c as usize].next;
        }
        run
    }

    fn check_element(&self, e: ElementId) -> Result<()> {
        if e >= self.n_base {
            return Err(ThorupError::invalid_argument(format!(
                "element handle {} outside the universe of {}",
                e, self.n_base
            )));
        }
        if !self.initialized {
            return Err(ThorupError::invalid_argument(
                "structure has not been initialized",
            ));
        }
        Ok(())
    }
}

/// Builds fresh split-findmin instances sized for a universe and an
/// operation count; consumed by the engine's preparation and inter-query
/// reset.
pub trait SplitFindminFactory {
    /// Creates an empty, uninitialized structure.
    fn create(&self, universe: usize, operations: usize) -> SplitFindmin;
}

/// The default factory producing [`SplitFindmin`] instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct GabowSplitFindmin;

impl SplitFindminFactory for GabowSplitFindmin {
    fn create(&self, universe: usize, operations: usize) -> SplitFindmin {
        SplitFindmin::new(universe, operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn build(n: usize, level: usize) -> SplitFindmin {
        let mut sfm = SplitFindmin::with_level(n, level);
        for v in 0..n {
            sfm.add(v as u32, INFINITE_COST);
        }
        sfm.initialize();
        sfm
    }

    /// Reference model: fragments of the universe with explicit minima.
    struct Model {
        fragments: Vec<Vec<(u32, i64)>>,
    }

    impl Model {
        fn new(n: usize) -> Self {
            Self {
                fragments: vec![(0..n as u32).map(|e| (e, INFINITE_COST)).collect()],
            }
        }

        fn decrease(&mut self, e: u32, cost: i64) {
            for frag in &mut self.fragments {
                for entry in frag.iter_mut() {
                    if entry.0 == e {
                        entry.1 = entry.1.min(cost);
                    }
                }
            }
        }

        fn split(&mut self, e: u32) {
            let idx = self
                .fragments
                .iter()
                .position(|f| f.iter().any(|&(x, _)| x == e))
                .unwrap();
            let frag = self.fragments.remove(idx);
            let cut = frag.iter().position(|&(x, _)| x == e).unwrap();
            let (left, right) = frag.split_at(cut + 1);
            self.fragments.insert(idx, right.to_vec());
            self.fragments.insert(idx, left.to_vec());
        }

        fn list_min(&self, e: u32) -> i64 {
            self.fragments
                .iter()
                .find(|f| f.iter().any(|&(x, _)| x == e))
                .unwrap()
                .iter()
                .map(|&(_, c)| c)
                .min()
                .unwrap()
        }
    }

    #[test]
    fn test_initialize_single_list() {
        let sfm = build(10, 1);
        assert!(sfm.is_initialized());
        assert_eq!(sfm.len(), 10);
        assert_eq!(sfm.list_cost(0).unwrap(), INFINITE_COST);
        // All elements share one top-level list.
        for e in 0..10 {
            assert_eq!(sfm.list_cost(e).unwrap(), INFINITE_COST);
        }
    }

    #[test]
    fn test_decrease_cost_propagates_to_list() {
        let mut sfm = build(16, 2);
        sfm.decrease_cost(9, 42).unwrap();
        assert_eq!(sfm.cost(9), 42);
        for e in 0..16 {
            assert_eq!(sfm.list_cost(e).unwrap(), 42);
        }
        sfm.decrease_cost(3, 7).unwrap();
        assert_eq!(sfm.list_cost(15).unwrap(), 7);
    }

    #[test]
    fn test_decrease_cost_is_idempotent_for_larger_values() {
        let mut sfm = build(8, 1);
        sfm.decrease_cost(4, 10).unwrap();
        // A non-decreasing update leaves both the cost and list cost alone.
        sfm.decrease_cost(4, 25).unwrap();
        assert_eq!(sfm.cost(4), 10);
        assert_eq!(sfm.list_cost(4).unwrap(), 10);
    }

    #[test]
    fn test_decrease_cost_rejects_bad_arguments() {
        let mut sfm = build(4, 1);
        assert!(sfm.decrease_cost(0, -1).is_err());
        assert!(sfm.decrease_cost(0, INFINITE_COST).is_err());
        assert!(sfm.decrease_cost(99, 5).is_err());
    }

    #[test]
    fn test_split_partitions_costs() {
        let mut sfm = build(10, 1);
        for e in 0..10u32 {
            sfm.decrease_cost(e, 100 + e as i64).unwrap();
        }
        let right = sfm.split(3).unwrap();
        assert_eq!(sfm.list_cost(0).unwrap(), 100);
        assert_eq!(sfm.list_cost(3).unwrap(), 100);
        assert_eq!(sfm.list_cost(4).unwrap(), 104);
        assert_eq!(sfm.list_cost(9).unwrap(), 104);
        assert_eq!(sfm.lists[right as usize].cost, 104);
    }

    #[test]
    fn test_split_on_last_element_leaves_empty_remainder() {
        let mut sfm = build(6, 1);
        sfm.decrease_cost(5, 50).unwrap();
        let right = sfm.split(5).unwrap();
        assert_eq!(sfm.lists[right as usize].cost, INFINITE_COST);
        assert_eq!(sfm.list_cost(5).unwrap(), 50);
    }

    #[test]
    fn test_split_on_first_element_keeps_singleton_left() {
        let mut sfm = build(6, 1);
        sfm.decrease_cost(0, 5).unwrap();
        sfm.decrease_cost(1, 9).unwrap();
        sfm.split(0).unwrap();
        assert_eq!(sfm.list_cost(0).unwrap(), 5);
        assert_eq!(sfm.list_cost(1).unwrap(), 9);
    }

    #[test]
    fn test_split_then_decrease_stays_in_fragment() {
        let mut sfm = build(12, 2);
        sfm.split(5).unwrap();
        sfm.decrease_cost(2, 20).unwrap();
        sfm.decrease_cost(8, 30).unwrap();
        assert_eq!(sfm.list_cost(0).unwrap(), 20);
        assert_eq!(sfm.list_cost(5).unwrap(), 20);
        assert_eq!(sfm.list_cost(6).unwrap(), 30);
        assert_eq!(sfm.list_cost(11).unwrap(), 30);
    }

    #[test]
    fn test_every_element_isolated() {
        let n = 9;
        let mut sfm = build(n, 2);
        for e in 0..n as u32 {
            sfm.decrease_cost(e, 10 * e as i64 + 1).unwrap();
        }
        for e in 0..n as u32 - 1 {
            sfm.split(e).unwrap();
        }
        for e in 0..n as u32 {
            assert_eq!(sfm.list_cost(e).unwrap(), 10 * e as i64 + 1);
        }
    }

    fn randomized_against_model(n: usize, level: usize, seed: u64) {
        let mut sfm = build(n, level);
        let mut model = Model::new(n);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut unsplit: Vec<u32> = (0..n as u32).collect();

        for _ in 0..4 * n {
            if rng.random_bool(0.6) || unsplit.len() <= 1 {
                let e = rng.random_range(0..n as u32);
                let cost = rng.random_range(0..1_000_000i64);
                sfm.decrease_cost(e, cost).unwrap();
                model.decrease(e, cost);
            } else {
                let idx = rng.random_range(0..unsplit.len());
                let e = unsplit.swap_remove(idx);
                sfm.split(e).unwrap();
                model.split(e);
            }
            for e in 0..n as u32 {
                assert_eq!(
                    sfm.list_cost(e).unwrap(),
                    model.list_min(e),
                    "element {} disagrees with the model",
                    e
                );
            }
        }
    }

    #[test]
    fn test_randomized_level_1() {
        randomized_against_model(24, 1, 7);
    }

    #[test]
    fn test_randomized_level_2() {
        randomized_against_model(40, 2, 11);
    }

    #[test]
    fn test_randomized_level_3() {
        randomized_against_model(64, 3, 13);
    }

    #[test]
    fn test_randomized_level_2_nested_sublists() {
        // Large enough that superelements of crowns form, so splits cut
        // through two structure levels.
        randomized_against_model(100, 2, 17);
    }

    #[test]
    fn test_randomized_level_3_nested_sublists() {
        randomized_against_model(150, 3, 19);
    }

    #[test]
    fn test_factory_picks_a_level() {
        let sfm = GabowSplitFindmin.create(100, 400);
        assert!(sfm.level() >= 1);
    }

    #[test]
    fn test_single_element_universe() {
        let mut sfm = build(1, 1);
        sfm.decrease_cost(0, 3).unwrap();
        assert_eq!(sfm.list_cost(0).unwrap(), 3);
        let right = sfm.split(0).unwrap();
        assert_eq!(sfm.lists[right as usize].cost, INFINITE_COST);
        assert_eq!(sfm.list_cost(0).unwrap(), 3);
    }
}
