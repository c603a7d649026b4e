//! Scenario tests for the public queue API
//!
//! These walk through realistic sequences of operations and check both the
//! resulting payload order and ring consistency after every step.

use element_queue::{merge_all, ops, Queue};

fn queue(values: &[&str]) -> Queue {
    Queue::try_from_values(values).unwrap()
}

fn contents(queue: &Queue) -> Vec<&str> {
    queue.iter().collect()
}

#[test]
fn test_end_to_end_scenario() {
    let mut q = Queue::new().unwrap();
    q.insert_tail("a").unwrap();
    q.insert_tail("b").unwrap();
    q.insert_tail("c").unwrap();
    assert!(q.is_consistent());

    let mut buf = [0u8; 8];
    let removed = q.remove_head(Some(&mut buf[..])).unwrap();
    assert_eq!(removed.value(), "a");
    assert_eq!(&buf[..2], b"a\0");
    removed.release();
    assert_eq!(contents(&q), ["b", "c"]);

    q.sort(false);
    assert_eq!(contents(&q), ["b", "c"]);

    q.reverse();
    assert_eq!(contents(&q), ["c", "b"]);
    assert!(q.is_consistent());
}

#[test]
fn test_delete_mid_examples() {
    let mut odd = queue(&["a", "b", "c"]);
    assert!(odd.delete_mid());
    assert_eq!(contents(&odd), ["a", "c"]);

    let mut even = queue(&["a", "b", "c", "d"]);
    assert!(even.delete_mid());
    assert_eq!(contents(&even), ["a", "b", "d"]);
}

#[test]
fn test_delete_mid_until_empty() {
    let mut q = queue(&["1", "2", "3", "4", "5", "6"]);
    let mut removed_order = Vec::new();
    while !q.is_empty() {
        let before: Vec<String> = q.iter().map(str::to_owned).collect();
        assert!(q.delete_mid());
        let after: Vec<String> = q.iter().map(str::to_owned).collect();
        let gone = before
            .iter()
            .find(|v| !after.contains(v))
            .cloned()
            .unwrap();
        removed_order.push(gone);
        assert!(q.is_consistent());
    }
    assert_eq!(removed_order, ["4", "3", "5", "2", "6", "1"]);
    assert!(!q.delete_mid());
}

#[test]
fn test_sort_then_dedup() {
    let mut q = queue(&["pear", "fig", "apple", "fig", "kiwi", "pear", "pear"]);
    q.sort(false);
    assert_eq!(
        contents(&q),
        ["apple", "fig", "fig", "kiwi", "pear", "pear", "pear"]
    );

    assert!(q.delete_dup());
    assert_eq!(contents(&q), ["apple", "kiwi"]);
    assert!(q.is_consistent());
}

#[test]
fn test_dedup_requires_grouping() {
    // Unsorted duplicates that are not adjacent survive.
    let mut q = queue(&["x", "y", "x", "x"]);
    assert!(q.delete_dup());
    assert_eq!(contents(&q), ["x", "y"]);
}

#[test]
fn test_ascend_lexicographic_example() {
    let mut q = queue(&["5", "2", "13", "3", "8"]);
    let kept = q.ascend();
    assert_eq!(kept, q.size());
    assert_eq!(contents(&q), ["13", "3", "8"]);
}

#[test]
fn test_descend_single_digits() {
    let mut q = queue(&["5", "2", "9", "3", "8"]);
    assert_eq!(q.descend(), 2);
    assert_eq!(contents(&q), ["9", "8"]);
}

#[test]
fn test_swap_and_reverse_k_compose() {
    let mut q = queue(&["1", "2", "3", "4", "5", "6", "7"]);
    q.swap();
    assert_eq!(contents(&q), ["2", "1", "4", "3", "6", "5", "7"]);

    // Swapping twice restores the original order.
    q.swap();
    assert_eq!(contents(&q), ["1", "2", "3", "4", "5", "6", "7"]);

    q.reverse_k(7);
    assert_eq!(contents(&q), ["7", "6", "5", "4", "3", "2", "1"]);

    q.reverse_k(8);
    assert_eq!(contents(&q), ["7", "6", "5", "4", "3", "2", "1"]);
    assert!(q.is_consistent());
}

#[test]
fn test_elements_move_between_queues_without_copying() {
    let mut a = queue(&["a1", "a2"]);
    let mut b = queue(&["b1"]);
    let before: Vec<*const u8> = a.iter().chain(b.iter()).map(str::as_ptr).collect();

    a.append(&mut b);
    let after: Vec<*const u8> = a.iter().map(str::as_ptr).collect();
    assert_eq!(before, after);
    assert!(b.is_empty());

    b.prepend(&mut a);
    assert_eq!(contents(&b), ["a1", "a2", "b1"]);
    assert!(a.is_empty());
}

#[test]
fn test_removed_element_outlives_queue() {
    let mut q = queue(&["keep", "drop"]);
    let kept = q.remove_head(None).unwrap();
    drop(q);
    assert_eq!(kept.into_value(), "keep");
}

#[test]
fn test_merge_all_of_sorted_queues() {
    let mut queues = vec![
        queue(&["b", "e", "h"]),
        queue(&["a", "d", "g"]),
        queue(&["c", "f", "i"]),
    ];
    assert_eq!(merge_all(&mut queues, false), 9);
    assert_eq!(
        contents(&queues[0]),
        ["a", "b", "c", "d", "e", "f", "g", "h", "i"]
    );
    assert!(queues[1].is_empty());
    assert!(queues[2].is_empty());
}

#[test]
fn test_ops_on_created_and_absent_queues() {
    let mut present = ops::new();
    let mut absent: Option<Queue> = None;

    for value in ["c", "a", "b"] {
        assert!(ops::insert_tail(present.as_mut(), value));
        assert!(!ops::insert_tail(absent.as_mut(), value));
    }
    ops::sort(present.as_mut(), true);
    assert_eq!(ops::descend(present.as_mut()), 3);
    assert_eq!(ops::descend(absent.as_mut()), 0);

    let mut buf = [0u8; 2];
    let element = ops::remove_tail(present.as_mut(), Some(&mut buf[..]));
    assert_eq!(&buf, b"a\0");
    ops::release_element(element);

    assert_eq!(ops::size(present.as_ref()), 2);
    ops::free(present);
    ops::free(absent);
}

#[test]
fn test_large_queue_operations() {
    let mut q = Queue::new().unwrap();
    for i in (0..2000).rev() {
        q.insert_tail(&format!("{:05}", i)).unwrap();
    }
    q.sort(false);
    assert!(q.is_sorted(false));
    assert_eq!(q.iter().next(), Some("00000"));

    q.reverse_k(3);
    q.reverse_k(3);
    assert!(q.is_sorted(false));

    assert_eq!(q.ascend(), 2000);
    assert_eq!(q.descend(), 1);
    assert_eq!(contents(&q), ["01999"]);
}
