//! One-shot channel classification at attach time.
//!
//! The policy is deliberately narrow: X, Y and Wheel on the Generic Desktop
//! page, plus every usage on the Button page. A device whose interface exposes
//! none of these (for example the keyboard interface of a combo receiver) is
//! not a pointer and must not be attached.

use crate::channel::InputChannel;
use crate::error::{Error, Result};
use crate::usage::{self, PAGE_BUTTON, PAGE_GENERIC_DESKTOP};

/// Channels accepted by [`classify`], in the order they were declared.
///
/// Membership is fixed once built. Sample values are still refreshed by the
/// host through [`iter_mut`](Self::iter_mut).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassifiedChannelSet {
    channels: Vec<InputChannel>,
}

impl ClassifiedChannelSet {
    /// `true` if at least one channel was accepted.
    #[inline]
    pub fn found(&self) -> bool {
        !self.channels.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InputChannel> {
        self.channels.iter()
    }

    /// Mutable access for sample refresh. Cannot add or remove channels.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, InputChannel> {
        self.channels.iter_mut()
    }

    /// Report ids referenced by the accepted channels, ascending and deduplicated.
    pub fn report_ids(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self.channels.iter().map(|c| c.report_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

impl<'a> IntoIterator for &'a ClassifiedChannelSet {
    type Item = &'a InputChannel;
    type IntoIter = std::slice::Iter<'a, InputChannel>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Whether a single channel is pointer-relevant.
pub fn is_pointer_channel(channel: &InputChannel) -> bool {
    if channel.is_collection() || channel.usage == usage::USAGE_UNDEFINED {
        return false;
    }

    match channel.usage_page {
        // One sensor on X/Y and a single vertical wheel. A horizontal wheel
        // (often reported on Z or AC Pan) is not supported.
        PAGE_GENERIC_DESKTOP => matches!(channel.usage, usage::GD_X | usage::GD_Y | usage::GD_WHEEL),
        // Every button is a candidate; the mask width is enforced per packet.
        PAGE_BUTTON => true,
        _ => false,
    }
}

/// Select the pointer-relevant subset of a device's declared channels.
///
/// Check [`ClassifiedChannelSet::found`] before attaching, or use
/// [`try_classify`] to get the failure as an error.
pub fn classify<I>(channels: I) -> ClassifiedChannelSet
where
    I: IntoIterator<Item = InputChannel>,
{
    let mut accepted = Vec::new();
    let mut skipped = 0usize;

    for channel in channels {
        if is_pointer_channel(&channel) {
            accepted.push(channel);
        } else {
            skipped += 1;
        }
    }

    tracing::debug!(
        accepted = accepted.len(),
        skipped,
        "classified pointer channels"
    );

    ClassifiedChannelSet { channels: accepted }
}

/// Like [`classify`], but an empty result is [`Error::ClassificationEmpty`].
pub fn try_classify<I>(channels: I) -> Result<ClassifiedChannelSet>
where
    I: IntoIterator<Item = InputChannel>,
{
    let set = classify(channels);
    if set.found() {
        Ok(set)
    } else {
        Err(Error::ClassificationEmpty)
    }
}
