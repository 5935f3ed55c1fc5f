use super::color::{Palette, Rgb};
use super::hierarchy::{HierarchyNode, NodeKind};

pub const DEFAULT_PADDING: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackOptions {
    pub padding: f64,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PackedNode {
    pub name: String,
    pub kind: NodeKind,
    pub depth: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub relevance: Option<f64>,
    /// Own score, or the nearest ancestor's when the node has none.
    pub effective_relevance: Option<f64>,
    pub color: Rgb,
    pub leaf_count: usize,
    pub coverage: Option<f64>,
    pub volume: Option<f64>,
}

impl PackedNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= self.r * self.r
    }
}

/// Arena of packed nodes in pre-order; index 0 is the synthetic root.
#[derive(Clone, Debug, PartialEq)]
pub struct PackedTree {
    nodes: Vec<PackedNode>,
}

impl PackedTree {
    pub const ROOT: usize = 0;

    pub fn nodes(&self) -> &[PackedNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&PackedNode> {
        self.nodes.get(index)
    }

    pub fn root(&self) -> &PackedNode {
        &self.nodes[Self::ROOT]
    }

    /// True when there is nothing to draw besides the synthetic root.
    pub fn is_empty_chart(&self) -> bool {
        self.root().children.is_empty()
    }

    /// Root first, `index` last.
    pub fn path_to(&self, index: usize) -> Vec<usize> {
        let mut path = Vec::new();
        let mut cursor = Some(index).filter(|index| *index < self.nodes.len());
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.nodes[current].parent;
        }
        path.reverse();
        path
    }

    pub fn resolve_colors(&mut self, palette: &Palette) {
        for node in &mut self.nodes {
            node.color = palette.color_for(node.effective_relevance.unwrap_or(0.0));
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Circle {
    x: f64,
    y: f64,
    r: f64,
}

impl Circle {
    fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }
}

/// Lays the tree out as nested circles inside a `width` × `height` canvas.
/// Returns `None` for an empty canvas.
pub fn pack(root: &HierarchyNode, width: f64, height: f64, options: &PackOptions) -> Option<PackedTree> {
    if !(width > 0.0 && height > 0.0) {
        return None;
    }

    let mut nodes = Vec::with_capacity(root.node_count());
    let mut weights = Vec::with_capacity(nodes.capacity());
    flatten(root, None, 0, &mut nodes, &mut weights);

    accumulate_metrics(&mut nodes);

    for (node, weight) in nodes.iter_mut().zip(&weights) {
        if node.is_leaf() {
            node.r = weight.max(0.0).sqrt();
        }
    }

    let extent = width.min(height);
    pack_children(&mut nodes, 0.0);
    let root_radius = nodes[PackedTree::ROOT].r;
    if root_radius > 0.0 {
        pack_children(&mut nodes, options.padding.max(0.0) * root_radius / extent);
    }

    let root_radius = nodes[PackedTree::ROOT].r;
    let scale = if root_radius > 0.0 {
        extent / (2.0 * root_radius)
    } else {
        0.0
    };
    translate(&mut nodes, width / 2.0, height / 2.0, scale, extent / 2.0);

    Some(PackedTree { nodes })
}

fn flatten(
    source: &HierarchyNode,
    parent: Option<usize>,
    depth: usize,
    nodes: &mut Vec<PackedNode>,
    weights: &mut Vec<f64>,
) -> f64 {
    let index = nodes.len();
    let effective_relevance = source
        .relevance
        .or_else(|| parent.and_then(|parent| nodes[parent].effective_relevance));

    nodes.push(PackedNode {
        name: source.name.clone(),
        kind: source.kind,
        depth,
        parent,
        children: Vec::with_capacity(source.children.len()),
        x: 0.0,
        y: 0.0,
        r: 0.0,
        relevance: source.relevance,
        effective_relevance,
        color: Rgb(0, 0, 0),
        leaf_count: 0,
        coverage: source.coverage,
        volume: source.volume,
    });
    weights.push(0.0);

    let mut weight = source.value.unwrap_or(0.0);
    for child in &source.children {
        let child_index = nodes.len();
        nodes[index].children.push(child_index);
        weight += flatten(child, Some(index), depth + 1, nodes, weights);
    }
    weights[index] = weight;
    weight
}

fn accumulate_metrics(nodes: &mut [PackedNode]) {
    for index in (0..nodes.len()).rev() {
        if nodes[index].is_leaf() {
            nodes[index].leaf_count = usize::from(nodes[index].kind != NodeKind::Root);
            continue;
        }

        let (leaf_count, child_volume) = nodes[index].children.iter().fold(
            (0usize, None::<f64>),
            |(count, volume), &child| {
                let child = &nodes[child];
                let volume = match (volume, child.volume) {
                    (Some(total), Some(value)) => Some(total + value),
                    (total, value) => total.or(value),
                };
                (count + child.leaf_count, volume)
            },
        );

        let node = &mut nodes[index];
        node.leaf_count = leaf_count;
        node.volume = match (node.volume, child_volume) {
            (Some(own), Some(children)) => Some(own + children),
            (own, children) => own.or(children),
        };
    }
}

/// Packs every internal node's children, deepest first, growing each child by `padding`.
fn pack_children(nodes: &mut [PackedNode], padding: f64) {
    for index in (0..nodes.len()).rev() {
        if nodes[index].is_leaf() {
            continue;
        }

        let mut circles = nodes[index]
            .children
            .iter()
            .map(|&child| Circle::new(0.0, 0.0, nodes[child].r + padding))
            .collect::<Vec<_>>();
        let enclosing = pack_siblings(&mut circles);

        for (&child, circle) in nodes[index].children.clone().iter().zip(&circles) {
            nodes[child].x = circle.x;
            nodes[child].y = circle.y;
        }
        nodes[index].r = enclosing + padding;
    }
}

fn translate(nodes: &mut [PackedNode], center_x: f64, center_y: f64, scale: f64, fallback_radius: f64) {
    for index in 0..nodes.len() {
        match nodes[index].parent {
            Some(parent) => {
                let (parent_x, parent_y) = (nodes[parent].x, nodes[parent].y);
                let node = &mut nodes[index];
                node.r *= scale;
                node.x = parent_x + scale * node.x;
                node.y = parent_y + scale * node.y;
            }
            None => {
                let node = &mut nodes[index];
                node.x = center_x;
                node.y = center_y;
                node.r = if scale > 0.0 {
                    node.r * scale
                } else {
                    fallback_radius
                };
            }
        }
    }
}

fn place(first: Circle, second: Circle, mut circle: Circle) -> Circle {
    let dx = first.x - second.x;
    let dy = first.y - second.y;
    let d2 = dx * dx + dy * dy;

    if d2 > 0.0 {
        let a2 = (second.r + circle.r).powi(2);
        let b2 = (first.r + circle.r).powi(2);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            circle.x = first.x - x * dx - y * dy;
            circle.y = first.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            circle.x = second.x + x * dx - y * dy;
            circle.y = second.y + x * dy + y * dx;
        }
    } else {
        circle.x = second.x + circle.r;
        circle.y = second.y;
    }

    circle
}

fn intersects(a: Circle, b: Circle) -> bool {
    let dr = a.r + b.r - 1e-6;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

/// Squared distance from the origin to the weighted midpoint of a front-chain pair.
fn pair_score(a: Circle, b: Circle) -> f64 {
    let ab = a.r + b.r;
    if ab <= 0.0 {
        return a.x * a.x + a.y * a.y;
    }
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

/// Places sibling circles tangent to each other around the origin and returns
/// the radius of their enclosing circle, which is centered at the origin afterwards.
fn pack_siblings(circles: &mut [Circle]) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return circles[0].r;
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles[0].r + circles[1].r;
    }

    circles[2] = place(circles[1], circles[0], circles[2]);

    // Front chain as a circular doubly linked list over circle indices.
    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    next[0] = 1;
    prev[1] = 0;
    next[1] = 2;
    prev[2] = 1;
    next[2] = 0;
    prev[0] = 2;

    let mut a = 0usize;
    let mut b = 1usize;
    let mut i = 3usize;

    'pack: while i < n {
        circles[i] = place(circles[a], circles[b], circles[i]);
        let c = i;

        let mut j = next[b];
        let mut k = prev[a];
        let mut sj = circles[b].r;
        let mut sk = circles[a].r;
        loop {
            if sj <= sk {
                if intersects(circles[j], circles[c]) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(circles[k], circles[c]) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].r;
                k = prev[k];
            }

            if j == next[k] {
                break;
            }
        }

        prev[c] = a;
        next[c] = b;
        next[a] = c;
        prev[b] = c;
        b = c;

        let mut best = pair_score(circles[a], circles[next[a]]);
        let mut cursor = next[c];
        while cursor != b {
            let score = pair_score(circles[cursor], circles[next[cursor]]);
            if score < best {
                a = cursor;
                best = score;
            }
            cursor = next[cursor];
        }
        b = next[a];
        i += 1;
    }

    let mut chain = vec![circles[b]];
    let mut cursor = next[b];
    while cursor != b {
        chain.push(circles[cursor]);
        cursor = next[cursor];
    }

    let Some(enclosing) = enclose(&chain) else {
        return circles.iter().map(|circle| circle.x.hypot(circle.y) + circle.r).fold(0.0, f64::max);
    };

    for circle in circles.iter_mut() {
        circle.x -= enclosing.x;
        circle.y -= enclosing.y;
    }
    enclosing.r
}

/// Smallest circle enclosing all `circles` (move-to-front incremental construction).
fn enclose(circles: &[Circle]) -> Option<Circle> {
    let mut basis: Vec<Circle> = Vec::new();
    let mut enclosing: Option<Circle> = None;
    let mut i = 0usize;

    while i < circles.len() {
        let circle = circles[i];
        if enclosing.is_some_and(|current| encloses_weak(current, circle)) {
            i += 1;
        } else {
            basis = extend_basis(&basis, circle)?;
            enclosing = Some(enclose_basis(&basis)?);
            i = 0;
        }
    }

    enclosing
}

fn extend_basis(basis: &[Circle], circle: Circle) -> Option<Vec<Circle>> {
    if encloses_weak_all(circle, basis) {
        return Some(vec![circle]);
    }

    for &member in basis {
        if encloses_not(circle, member) && encloses_weak_all(enclose_two(member, circle), basis) {
            return Some(vec![member, circle]);
        }
    }

    for i in 0..basis.len().saturating_sub(1) {
        for j in (i + 1)..basis.len() {
            let (first, second) = (basis[i], basis[j]);
            if encloses_not(enclose_two(first, second), circle)
                && encloses_not(enclose_two(first, circle), second)
                && encloses_not(enclose_two(second, circle), first)
                && encloses_weak_all(enclose_three(first, second, circle), basis)
            {
                return Some(vec![first, second, circle]);
            }
        }
    }

    None
}

fn encloses_not(a: Circle, b: Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: Circle, b: Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|&member| encloses_weak(a, member))
}

fn enclose_basis(basis: &[Circle]) -> Option<Circle> {
    match basis {
        [a] => Some(*a),
        [a, b] => Some(enclose_two(*a, *b)),
        [a, b, c] => Some(enclose_three(*a, *b, *c)),
        _ => None,
    }
}

fn enclose_two(a: Circle, b: Circle) -> Circle {
    let x21 = b.x - a.x;
    let y21 = b.y - a.y;
    let r21 = b.r - a.r;
    let l = x21.hypot(y21);
    if l <= 0.0 {
        return if a.r >= b.r { a } else { b };
    }
    Circle::new(
        (a.x + b.x + x21 / l * r21) / 2.0,
        (a.y + b.y + y21 / l * r21) / 2.0,
        (l + a.r + b.r) / 2.0,
    )
}

fn enclose_three(a: Circle, b: Circle, c: Circle) -> Circle {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let (x3, y3, r3) = (c.x, c.y, c.r);

    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });

    Circle::new(x1 + xa + xb * r, y1 + ya + yb * r, r)
}
