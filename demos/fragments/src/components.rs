use actix_htmx_fragments::{Component, FragmentError};
use askama::Template;

pub const COUNTER: &str = "counter";
pub const TASK_LIST: &str = "task_list";
pub const TASK_COUNT: &str = "task_count";

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    count: u32,
    tasks: &'a [String],
}

#[derive(Template)]
#[template(path = "content.html")]
struct ContentTemplate<'a> {
    count: u32,
    tasks: &'a [String],
}

#[derive(Template)]
#[template(path = "counter.html")]
struct CounterTemplate {
    count: u32,
}

#[derive(Template)]
#[template(path = "task_list.html")]
struct TaskListTemplate<'a> {
    tasks: &'a [String],
}

#[derive(Template)]
#[template(path = "task_count_oob.html")]
struct TaskCountTemplate<'a> {
    tasks: &'a [String],
}

fn render<T: Template>(template: &T) -> Result<String, FragmentError> {
    template.render().map_err(FragmentError::render)
}

/// The home page. Every block of `page.html` can be requested on its own.
pub struct Home {
    pub count: u32,
    pub tasks: Vec<String>,
}

impl Component for Home {
    fn template_name(&self) -> &str {
        "page.html"
    }

    fn render_page(&self) -> Result<String, FragmentError> {
        render(&PageTemplate {
            count: self.count,
            tasks: &self.tasks,
        })
    }

    fn render_fragment(&self, name: &str) -> Result<String, FragmentError> {
        match name {
            "content" => render(&ContentTemplate {
                count: self.count,
                tasks: &self.tasks,
            }),
            COUNTER => render(&CounterTemplate { count: self.count }),
            TASK_LIST => render(&TaskListTemplate { tasks: &self.tasks }),
            other => Err(FragmentError::unknown(self.template_name(), other)),
        }
    }
}

/// Out-of-band update for the task count in the navigation bar.
pub struct TaskCount {
    pub tasks: Vec<String>,
}

impl Component for TaskCount {
    fn template_name(&self) -> &str {
        "task_count_oob.html"
    }

    fn default_fragment(&self) -> Option<&str> {
        Some(TASK_COUNT)
    }

    fn render_page(&self) -> Result<String, FragmentError> {
        Err(FragmentError::unknown(self.template_name(), "page"))
    }

    fn render_fragment(&self, name: &str) -> Result<String, FragmentError> {
        match name {
            TASK_COUNT => render(&TaskCountTemplate { tasks: &self.tasks }),
            other => Err(FragmentError::unknown(self.template_name(), other)),
        }
    }
}
