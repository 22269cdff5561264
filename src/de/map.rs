use serde::de::{self, value::BorrowedStrDeserializer};

use crate::de::{utf8, Error, Result, ValueDeserializer};
use crate::qs::{Dictionary, Entry};

pub(crate) struct MapAccess<'a, 'de, const N: usize> {
    dict: &'a Dictionary<'de, N>,
    index: usize,
    value: Option<&'de [u8]>,
}

impl<'a, 'de, const N: usize> MapAccess<'a, 'de, N> {
    pub(crate) fn new(dict: &'a Dictionary<'de, N>) -> Self {
        MapAccess {
            dict,
            index: 0,
            value: None,
        }
    }

    /// Next entry whose key hasn't been seen before
    fn next_entry(&mut self) -> Option<Entry<'de>> {
        let entries = self.dict.entries();
        while let Some(entry) = entries.get(self.index) {
            let seen = &entries[..self.index];
            self.index += 1;
            if !seen.iter().any(|earlier| earlier.key == entry.key) {
                return Some(*entry);
            }
        }
        None
    }
}

impl<'a, 'de, const N: usize> de::MapAccess<'de> for MapAccess<'a, 'de, N> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.next_entry() {
            Some(entry) => {
                self.value = Some(entry.value);
                let key = utf8(entry.key)?;
                seed.deserialize(BorrowedStrDeserializer::new(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::Custom),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.dict.len() - self.index)
    }
}
