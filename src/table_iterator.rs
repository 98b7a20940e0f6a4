//! A generic row-iterator shared by every table type.

pub struct TableIterator<T> {
    pub(crate) table: T,
    pub(crate) pos: i64,
}

pub(crate) fn make_table_iterator<TABLE>(table: TABLE) -> TableIterator<TABLE> {
    TableIterator { table, pos: 0 }
}
