use serde::Serialize;

/// An annotation processor and the classpath it is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Processor {
    /// Fully qualified processor class name.
    pub processor_class: String,
    /// Classpath entries, in the order they were declared.
    pub class_path: Vec<String>,
}

impl Processor {
    pub fn new(
        processor_class: impl Into<String>,
        class_path: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            processor_class: processor_class.into(),
            class_path: class_path.into_iter().map(Into::into).collect(),
        }
    }
}

/// The annotation processors configured for a compile request.
///
/// A request without a descriptor has no annotation processing configured.
/// A descriptor with no processors is a distinct state: processing is
/// configured, but there is nothing to run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessorDescriptor {
    pub processors: Vec<Processor>,
}

impl ProcessorDescriptor {
    pub fn new(processors: Vec<Processor>) -> Self {
        Self { processors }
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Processor class names in declaration order.
    pub fn processor_classes(&self) -> impl Iterator<Item = &str> {
        self.processors.iter().map(|p| p.processor_class.as_str())
    }

    /// Classpath entries of all processors, concatenated in processor order.
    pub fn class_path(&self) -> impl Iterator<Item = &str> {
        self.processors
            .iter()
            .flat_map(|p| p.class_path.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_path_concatenates_in_processor_order() {
        let descriptor = ProcessorDescriptor::new(vec![
            Processor::new("A", ["p1", "p2"]),
            Processor::new("B", ["p3"]),
        ]);

        let class_path: Vec<_> = descriptor.class_path().collect();
        assert_eq!(class_path, ["p1", "p2", "p3"]);

        let classes: Vec<_> = descriptor.processor_classes().collect();
        assert_eq!(classes, ["A", "B"]);
    }

    #[test]
    fn test_empty_descriptor() {
        assert!(ProcessorDescriptor::default().is_empty());
    }
}
