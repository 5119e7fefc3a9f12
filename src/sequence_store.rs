/// Flat storage of the UTF-8 text of every table entry, addressed by entry id.
///
/// Entry `i` occupies `data_store[startpos_list[i]..startpos_list[i + 1]]`.
#[derive(Debug, Clone)]
pub(crate) struct SequenceStore {
    startpos_list: Vec<usize>,
    data_store: String,
}

impl Default for SequenceStore {
    fn default() -> Self {
        SequenceStore {
            startpos_list: vec![0],
            data_store: String::new(),
        }
    }
}

impl SequenceStore {
    pub(crate) fn len(&self) -> usize {
        self.startpos_list.len() - 1
    }

    pub(crate) fn push(&mut self, seq: &[char]) -> u32 {
        let idx = u32::try_from(self.len()).unwrap_or(u32::MAX);
        self.data_store.extend(seq.iter());
        self.startpos_list.push(self.data_store.len());
        idx
    }

    pub(crate) fn get(&self, idx: u32) -> &str {
        let idx = idx as usize;
        match (self.startpos_list.get(idx), self.startpos_list.get(idx + 1)) {
            (Some(&start), Some(&end)) => &self.data_store[start..end],
            _ => "",
        }
    }

    /// Longest stored text, in bytes.
    pub(crate) fn max_len(&self) -> usize {
        self.startpos_list
            .windows(2)
            .map(|w| w[1] - w[0])
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.startpos_list.windows(2).enumerate().map(move |(idx, w)| {
            (
                u32::try_from(idx).unwrap_or(u32::MAX),
                &self.data_store[w[0]..w[1]],
            )
        })
    }
}
