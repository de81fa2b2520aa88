use std::ops::Deref;
use std::str::FromStr;

use smallvec::SmallVec;

/// Named path parameters, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    buf: SmallVec<[(Box<str>, String); 4]>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.buf
            .iter()
            .find_map(|(k, v)| if name == &**k { Some(v.as_str()) } else { None })
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(T::from_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.buf.iter().map(|(k, v)| (&**k, v.as_str()))
    }

    pub(crate) fn clear(&mut self) {
        self.buf.clear();
    }

    pub(crate) fn push(&mut self, name: &str, value: &str) {
        self.buf.push((name.into(), value.to_owned()));
    }
}

impl Deref for Params {
    type Target = [(Box<str>, String)];
    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}
