use crate::model::{Filter, Todo};

/// Lazy, order-preserving view over a todo list. Clone an unstarted view to
/// walk it more than once.
#[derive(Debug, Clone)]
pub struct FilterView<'a> {
    inner: std::slice::Iter<'a, Todo>,
    filter: Filter,
}

impl<'a> Iterator for FilterView<'a> {
    type Item = &'a Todo;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.inner.find(|t| filter.matches(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

pub fn filter_view(todos: &[Todo], filter: Filter) -> FilterView<'_> {
    FilterView {
        inner: todos.iter(),
        filter,
    }
}

/// (completed, total) counts for the whole list
pub fn completion_counts(todos: &[Todo]) -> (usize, usize) {
    let done = todos.iter().filter(|t| t.completed).count();
    (done, todos.len())
}
