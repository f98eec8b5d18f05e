//! Custom types taking part in a clone through `Cloneable`

use std::{cell::RefCell, rc::Rc};

use gumpkit::{
    Result,
    cloner::{ClonerError, Cloneable, Cloner, Value, clone_value},
};

/// A linked node whose successor may point back at itself.
struct Node {
    label: String,
    next: RefCell<Value>,
}

impl Node {
    fn new(label: &str) -> Rc<Node> {
        Rc::new(Node {
            label: label.to_string(),
            next: RefCell::new(Value::Null),
        })
    }
}

impl Cloneable for Node {
    fn clone_with(&self, original: &Value, cloner: &mut Cloner) -> Result<Value> {
        let copy = Node::new(&self.label);
        let wrapped = Value::Custom(copy.clone());
        cloner.register(original, &wrapped);

        let next = cloner.clone_value(&self.next.borrow())?;
        *copy.next.borrow_mut() = next;
        Ok(wrapped)
    }

    fn type_name(&self) -> &'static str {
        "Node"
    }

    fn view(&self) -> Option<Value> {
        Some(Value::object([
            ("label", Value::from(self.label.as_str())),
            ("next", self.next.borrow().clone()),
        ]))
    }
}

/// A custom type that refuses to be copied.
struct Locked;

impl Cloneable for Locked {
    fn clone_with(&self, _original: &Value, _cloner: &mut Cloner) -> Result<Value> {
        Err(ClonerError::CustomFailed {
            type_name: self.type_name().to_string(),
            reason: "locked".to_string(),
        }
        .into())
    }
}

/// A custom type whose copy is assembled from short-lived values it builds
/// and clones on the spot.
struct Scratch {
    slots: i64,
}

impl Cloneable for Scratch {
    fn clone_with(&self, _original: &Value, cloner: &mut Cloner) -> Result<Value> {
        let mut copies = Vec::new();
        for slot in 0..self.slots {
            let temporary = Value::array([Value::Int(slot)]);
            copies.push(cloner.clone_value(&temporary)?);
        }
        Ok(Value::array(copies))
    }
}

fn next_of(value: &Value) -> Value {
    match value {
        Value::Custom(custom) => custom
            .view()
            .and_then(|view| view.get_field("next"))
            .expect("Node should expose its successor"),
        other => panic!("Expected a custom node, got: {other:?}"),
    }
}

#[test]
fn test_custom_self_cycle() {
    let node = Node::new("a");
    let original = Value::Custom(node.clone());
    *node.next.borrow_mut() = original.clone();

    let copy = clone_value(&original).unwrap();

    assert!(!copy.ptr_eq(&original));
    assert!(next_of(&copy).ptr_eq(&copy));
    assert!(copy.deep_eq(&original));
}

#[test]
fn test_cycle_through_custom_and_array() {
    let node = Node::new("n");
    let list = Value::array([Value::Custom(node.clone())]);
    *node.next.borrow_mut() = list.clone();

    let copy = clone_value(&list).unwrap();
    let copied_node = copy.get_index(0).unwrap();

    assert!(next_of(&copied_node).ptr_eq(&copy));
    assert!(!copied_node.ptr_eq(&list.get_index(0).unwrap()));
}

#[test]
fn test_custom_failure_propagates() {
    let original = Value::array([Value::Int(1), Value::custom(Locked)]);

    let err = clone_value(&original).unwrap_err();

    assert!(err.is_cloner_error());
    assert!(!err.is_unsupported());
    assert!(err.to_string().contains("locked"));
}

#[test]
fn test_temporaries_cloned_inside_custom_keep_their_content() {
    let original = Value::array([Value::custom(Scratch { slots: 8 })]);

    let copy = clone_value(&original).unwrap();
    let slots = copy.get_index(0).unwrap();

    for slot in 0..8 {
        let inner = slots.get_index(slot as usize).unwrap();
        match inner.get_index(0) {
            Some(Value::Int(n)) => assert_eq!(n, slot, "slot {slot} got the copy of {n}"),
            other => panic!("Expected an int in slot {slot}, got: {other:?}"),
        }
    }
}
