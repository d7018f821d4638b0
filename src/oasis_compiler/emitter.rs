// Instruction stream for the assembler listing
//
// Every fragment is one listing line (it may embed a line break) together
// with the number of bytes it contributes to the resource. The running byte
// offset counts the bytes of the current unit only.

use log::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub size: u32,
}

/// Index of a fragment whose text is filled in later.
///
/// A placeholder taken while measuring has no index; patching it is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(Option<usize>);

/// Byte offset saved by `begin_measure`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct MeasureMark {
    offset: u32,
}

#[derive(Debug, Default)]
pub struct Emitter {
    fragments: Vec<Fragment>,
    byte_offset: u32,
    measure_depth: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` contributing `size` bytes. While measuring only the
    /// offset moves.
    pub fn emit(&mut self, text: impl Into<String>, size: u32) {
        self.byte_offset += size;
        if self.is_measuring() {
            return;
        }
        let text = text.into();
        trace!("emit @{:>4} +{}: {}", self.byte_offset - size, size, text);
        self.fragments.push(Fragment { text, size });
    }

    /// Reserve a fragment of `size` bytes to be overwritten by `patch`
    pub fn placeholder(&mut self, size: u32) -> Placeholder {
        let index = if self.is_measuring() {
            None
        } else {
            Some(self.fragments.len())
        };
        self.emit("00,00", size);
        Placeholder(index)
    }

    /// Replace the text of a placeholder; its size stays as reserved
    pub fn patch(&mut self, placeholder: Placeholder, text: impl Into<String>) {
        if let Placeholder(Some(index)) = placeholder {
            if let Some(fragment) = self.fragments.get_mut(index) {
                fragment.text = text.into();
                trace!("patched fragment {}: {}", index, fragment.text);
            }
        }
    }

    /// Enter measuring mode: following emits only advance the offset.
    /// Calls nest.
    pub fn begin_measure(&mut self) -> MeasureMark {
        self.measure_depth += 1;
        MeasureMark {
            offset: self.byte_offset,
        }
    }

    /// Leave measuring mode, restore the offset and return the bytes tallied
    pub fn end_measure(&mut self, mark: MeasureMark) -> u32 {
        let size = self.byte_offset - mark.offset;
        self.byte_offset = mark.offset;
        self.measure_depth = self.measure_depth.saturating_sub(1);
        size
    }

    pub fn is_measuring(&self) -> bool {
        self.measure_depth > 0
    }

    pub fn byte_offset(&self) -> u32 {
        self.byte_offset
    }

    /// Start a new unit at offset 0
    pub fn reset_offset(&mut self) {
        self.byte_offset = 0;
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Consume the emitter, producing the listing text (one fragment per line)
    pub fn into_listing(self) -> String {
        let mut listing = String::new();
        for fragment in self.fragments {
            listing.push_str(&fragment.text);
            listing.push('\n');
        }
        listing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_tracks_offset() {
        let mut emitter = Emitter::new();
        emitter.emit("res_start", 0);
        emitter.emit(".byt SC_ASSIGN, 64, 200", 3);
        emitter.emit(".byt 5", 1);

        assert_eq!(emitter.byte_offset(), 4);
        assert_eq!(emitter.fragments().len(), 3);
        assert_eq!(emitter.fragments()[1].size, 3);
    }

    #[test]
    fn test_placeholder_patch_in_place() {
        let mut emitter = Emitter::new();
        emitter.emit(".byt SC_JUMP_IF, SF_NOT", 2);
        let hole = emitter.placeholder(2);
        emitter.emit(".byt SC_STOP_SCRIPT", 1);
        emitter.patch(hole, ".word 5");

        let texts: Vec<&str> = emitter.fragments().iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec![".byt SC_JUMP_IF, SF_NOT", ".word 5", ".byt SC_STOP_SCRIPT"]);
        assert_eq!(emitter.byte_offset(), 5);
    }

    #[test]
    fn test_measure_appends_nothing_and_restores_offset() {
        let mut emitter = Emitter::new();
        emitter.emit(".byt 1", 1);

        let mark = emitter.begin_measure();
        emitter.emit(".byt SF_ADD", 1);
        let hole = emitter.placeholder(2);
        emitter.patch(hole, ".word 9");
        let size = emitter.end_measure(mark);

        assert_eq!(size, 3);
        assert_eq!(emitter.byte_offset(), 1);
        assert_eq!(emitter.fragments().len(), 1);
        assert!(!emitter.is_measuring());
    }

    #[test]
    fn test_nested_measure() {
        let mut emitter = Emitter::new();
        let outer = emitter.begin_measure();
        emitter.emit("a", 2);
        let inner = emitter.begin_measure();
        emitter.emit("b", 5);
        assert_eq!(emitter.end_measure(inner), 5);
        assert!(emitter.is_measuring());
        emitter.emit("c", 1);
        assert_eq!(emitter.end_measure(outer), 3);
        assert!(emitter.fragments().is_empty());
    }

    #[test]
    fn test_into_listing() {
        let mut emitter = Emitter::new();
        emitter.emit(".(", 0);
        emitter.emit(".byt VERB_USE\n.word (l_Use-res_start)", 3);
        assert_eq!(
            emitter.into_listing(),
            ".(\n.byt VERB_USE\n.word (l_Use-res_start)\n"
        );
    }
}
