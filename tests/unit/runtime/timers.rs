use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn fires_in_deadline_then_schedule_order() {
    let mut q = TimerQueue::new();
    q.schedule_at(ms(300), "c");
    q.schedule_at(ms(100), "a");
    q.schedule_at(ms(100), "b");

    assert!(q.pop_due(ms(99)).is_none());
    let mut fired = Vec::new();
    while let Some((_, at, e)) = q.pop_due(ms(1000)) {
        fired.push((at, e));
    }
    assert_eq!(fired, vec![(ms(100), "a"), (ms(100), "b"), (ms(300), "c")]);
    assert!(q.is_empty());
}

#[test]
fn cancel_is_idempotent_and_safe_after_firing() {
    let mut q = TimerQueue::new();
    let a = q.schedule_at(ms(10), 1);
    let b = q.schedule_at(ms(20), 2);

    assert!(q.cancel(a));
    assert!(!q.cancel(a));
    assert!(!q.is_pending(a));

    assert_eq!(q.pop_due(ms(20)).map(|(id, _, e)| (id, e)), Some((b, 2)));
    assert!(!q.cancel(b));
    assert!(q.pop_due(ms(1000)).is_none());
}

#[test]
fn cancel_slot_clears_handle() {
    let mut q = TimerQueue::new();
    let mut slot = Some(q.schedule_at(ms(5), ()));
    q.cancel_slot(&mut slot);
    assert!(slot.is_none());
    q.cancel_slot(&mut slot);
    assert!(q.is_empty());
}

#[test]
fn cancel_all_drops_everything() {
    let mut q = TimerQueue::new();
    let a = q.schedule_at(ms(1), 'x');
    q.schedule_at(ms(2), 'y');
    q.cancel_all();
    assert_eq!(q.len(), 0);
    assert_eq!(q.next_deadline(), None);
    assert!(!q.cancel(a));
}
