use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Exclusive right to hold an open capture device.
///
/// Capture hardware supports one session at a time, so every recorder
/// claims a slot before opening its device. Claiming is a single
/// compare-and-swap, which makes concurrent starts from several recorders
/// race-free: exactly one wins.
#[derive(Debug, Default)]
pub struct DeviceSlot {
    occupied: AtomicBool,
}

static GLOBAL_SLOT: OnceLock<Arc<DeviceSlot>> = OnceLock::new();

impl DeviceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide slot shared by every recorder built without an
    /// explicit one.
    pub fn global() -> Arc<DeviceSlot> {
        Arc::clone(GLOBAL_SLOT.get_or_init(|| Arc::new(DeviceSlot::new())))
    }

    /// Whether some recorder currently holds an open device.
    pub fn is_occupied(&self) -> bool {
        self.occupied.load(Ordering::SeqCst)
    }

    /// Take the slot, or None if it is already held.
    pub(crate) fn try_claim(self: &Arc<Self>) -> Option<SlotClaim> {
        self.occupied
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| SlotClaim {
                slot: Arc::clone(self),
            })
    }
}

/// Held while a device is open; frees the slot when dropped.
#[derive(Debug)]
pub(crate) struct SlotClaim {
    slot: Arc<DeviceSlot>,
}

impl Drop for SlotClaim {
    fn drop(&mut self) {
        self.slot.occupied.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_fails_until_first_is_dropped() {
        let slot = Arc::new(DeviceSlot::new());

        let claim = slot.try_claim();
        assert!(claim.is_some());
        assert!(slot.is_occupied());
        assert!(slot.try_claim().is_none());

        drop(claim);
        assert!(!slot.is_occupied());
        assert!(slot.try_claim().is_some());
    }

    #[test]
    fn global_slot_is_shared() {
        assert!(Arc::ptr_eq(&DeviceSlot::global(), &DeviceSlot::global()));
    }

    #[test]
    fn concurrent_claims_have_one_winner() {
        let slot = Arc::new(DeviceSlot::new());
        let winners = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let slot = Arc::clone(&slot);
                    scope.spawn(move || slot.try_claim())
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .collect::<Vec<_>>()
        });

        assert_eq!(winners.iter().filter(|c| c.is_some()).count(), 1);
    }
}
