//! Capability-based dispatch over the UI entity tree.
//!
//! Nodes opt into behaviors by returning themselves from the matching
//! `as_*` accessor. [`traverse`] walks a subtree in pre-order (a node before
//! its children, children in declaration order) and stops as soon as a
//! visitor reports that a node handled the request.

mod view_manager;

use strum_macros::Display;
use strum_macros::EnumString;

pub use view_manager::MessageView;
pub use view_manager::TextInput;
pub use view_manager::ViewManager;
pub use view_manager::WindowKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    Start,
    End,
}

pub trait Scrollable {
    fn scroll(&mut self, direction: Direction, amount: usize);
}

pub trait Selectable {
    fn select(&mut self);
}

pub trait Toggleable {
    fn toggle(&mut self);
}

pub trait BackHandler {
    /// Returns false when the node declines, letting the caller fall back.
    fn back(&mut self) -> bool;
}

/// A node in the view tree.
pub trait UiEntity {
    fn children_mut(&mut self) -> Vec<&mut dyn UiEntity> {
        Vec::new()
    }

    fn as_scrollable(&mut self) -> Option<&mut dyn Scrollable> {
        None
    }

    fn as_selectable(&mut self) -> Option<&mut dyn Selectable> {
        None
    }

    fn as_toggleable(&mut self) -> Option<&mut dyn Toggleable> {
        None
    }

    fn as_back_handler(&mut self) -> Option<&mut dyn BackHandler> {
        None
    }
}

/// Verdict of a visitor on one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// The node lacks the capability. Keep searching.
    Continue,
    /// The node has the capability but chose not to handle the request.
    /// Keep searching.
    Declined,
    /// The node handled the request. Visit nothing else.
    Stop,
}

/// Outcome of a whole traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    /// At least one capable node declined and none handled the request.
    Declined,
    /// No node had the capability.
    Unhandled,
}

pub fn traverse(
    root: &mut dyn UiEntity,
    visit: &mut dyn FnMut(&mut dyn UiEntity) -> Visit,
) -> Dispatch {
    let mut declined = false;
    if walk(root, visit, &mut declined) {
        Dispatch::Handled
    } else if declined {
        Dispatch::Declined
    } else {
        Dispatch::Unhandled
    }
}

fn walk(
    node: &mut dyn UiEntity,
    visit: &mut dyn FnMut(&mut dyn UiEntity) -> Visit,
    declined: &mut bool,
) -> bool {
    match visit(&mut *node) {
        Visit::Stop => return true,
        Visit::Declined => *declined = true,
        Visit::Continue => {}
    }
    for child in node.children_mut() {
        if walk(child, visit, declined) {
            return true;
        }
    }
    false
}

pub fn scroll_first(root: &mut dyn UiEntity, direction: Direction, amount: usize) -> Dispatch {
    traverse(root, &mut |node: &mut dyn UiEntity| match node.as_scrollable() {
        Some(scrollable) => {
            scrollable.scroll(direction, amount);
            Visit::Stop
        }
        None => Visit::Continue,
    })
}

pub fn select_first(root: &mut dyn UiEntity) -> Dispatch {
    traverse(root, &mut |node: &mut dyn UiEntity| match node.as_selectable() {
        Some(selectable) => {
            selectable.select();
            Visit::Stop
        }
        None => Visit::Continue,
    })
}

pub fn toggle_first(root: &mut dyn UiEntity) -> Dispatch {
    traverse(root, &mut |node: &mut dyn UiEntity| match node.as_toggleable() {
        Some(toggleable) => {
            toggleable.toggle();
            Visit::Stop
        }
        None => Visit::Continue,
    })
}

/// Offers a back request to every BackHandler in order until one accepts.
pub fn back_first(root: &mut dyn UiEntity) -> Dispatch {
    traverse(root, &mut |node: &mut dyn UiEntity| match node.as_back_handler() {
        Some(handler) => {
            if handler.back() {
                Visit::Stop
            } else {
                Visit::Declined
            }
        }
        None => Visit::Continue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::str::FromStr;

    type Log = Rc<RefCell<Vec<String>>>;

    #[derive(Default)]
    struct Node {
        name: &'static str,
        log: Log,
        scrollable: bool,
        selectable: bool,
        accepts_back: Option<bool>,
        children: Vec<Node>,
    }

    impl Node {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Rc::clone(log),
                ..Default::default()
            }
        }

        fn with_children(mut self, children: Vec<Node>) -> Self {
            self.children = children;
            self
        }

        fn record(&self, entry: String) {
            self.log.borrow_mut().push(entry);
        }
    }

    impl UiEntity for Node {
        fn children_mut(&mut self) -> Vec<&mut dyn UiEntity> {
            self.children
                .iter_mut()
                .map(|child| child as &mut dyn UiEntity)
                .collect()
        }

        fn as_scrollable(&mut self) -> Option<&mut dyn Scrollable> {
            self.record(format!("visit {}", self.name));
            if self.scrollable { Some(self) } else { None }
        }

        fn as_selectable(&mut self) -> Option<&mut dyn Selectable> {
            if self.selectable { Some(self) } else { None }
        }

        fn as_back_handler(&mut self) -> Option<&mut dyn BackHandler> {
            if self.accepts_back.is_some() { Some(self) } else { None }
        }
    }

    impl Scrollable for Node {
        fn scroll(&mut self, direction: Direction, amount: usize) {
            self.record(format!("scroll {} {direction} {amount}", self.name));
        }
    }

    impl Selectable for Node {
        fn select(&mut self) {
            self.record(format!("select {}", self.name));
        }
    }

    impl BackHandler for Node {
        fn back(&mut self) -> bool {
            self.record(format!("back {}", self.name));
            self.accepts_back.unwrap_or(false)
        }
    }

    fn entries(log: &Log) -> Vec<String> {
        log.borrow().clone()
    }

    #[test]
    fn single_scrollable_is_scrolled_once_and_walk_stops() {
        let log = Log::default();
        let mut list = Node::new("list", &log);
        list.scrollable = true;
        let mut root = Node::new("window", &log).with_children(vec![
            Node::new("header", &log),
            Node::new("body", &log).with_children(vec![list, Node::new("after-list", &log)]),
            Node::new("footer", &log),
        ]);

        let result = scroll_first(&mut root, Direction::Down, 3);

        assert_eq!(result, Dispatch::Handled);
        assert_eq!(
            entries(&log),
            vec![
                "visit window",
                "visit header",
                "visit body",
                "visit list",
                "scroll list down 3",
            ]
        );
    }

    #[test]
    fn first_capable_node_in_preorder_wins() {
        let log = Log::default();
        let mut parent = Node::new("parent", &log);
        parent.selectable = true;
        let mut child = Node::new("child", &log);
        child.selectable = true;
        parent.children = vec![child];
        let mut root = Node::new("root", &log).with_children(vec![parent]);

        assert_eq!(select_first(&mut root), Dispatch::Handled);
        assert_eq!(entries(&log), vec!["select parent"]);
    }

    #[test]
    fn missing_capability_is_unhandled() {
        let log = Log::default();
        let mut root = Node::new("root", &log).with_children(vec![Node::new("leaf", &log)]);

        assert_eq!(select_first(&mut root), Dispatch::Unhandled);
        assert_eq!(toggle_first(&mut root), Dispatch::Unhandled);
        assert!(entries(&log).is_empty());
    }

    #[test]
    fn declining_back_handler_passes_request_on() {
        let log = Log::default();
        let mut refuses = Node::new("refuses", &log);
        refuses.accepts_back = Some(false);
        let mut accepts = Node::new("accepts", &log);
        accepts.accepts_back = Some(true);
        let mut root = Node::new("root", &log).with_children(vec![refuses, accepts]);

        assert_eq!(back_first(&mut root), Dispatch::Handled);
        assert_eq!(entries(&log), vec!["back refuses", "back accepts"]);
    }

    #[test]
    fn all_back_handlers_declining_is_reported() {
        let log = Log::default();
        let mut refuses = Node::new("refuses", &log);
        refuses.accepts_back = Some(false);
        let mut root = Node::new("root", &log).with_children(vec![refuses]);

        assert_eq!(back_first(&mut root), Dispatch::Declined);
    }

    #[test]
    fn directions_parse_strictly() {
        assert_eq!(Direction::from_str("up"), Ok(Direction::Up));
        assert_eq!(Direction::from_str("start"), Ok(Direction::Start));
        assert!(Direction::from_str("sideways").is_err());
        assert_eq!(Direction::End.to_string(), "end");
    }
}
