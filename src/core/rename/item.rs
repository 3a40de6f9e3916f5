/// Anything with a mutable display name.
pub trait Renameable {
    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
}

impl Renameable for String {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn set_name(&mut self, name: String) {
        *self = name;
    }
}

impl<T: Renameable + ?Sized> Renameable for &mut T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn set_name(&mut self, name: String) {
        (**self).set_name(name)
    }
}

impl<T: Renameable + ?Sized> Renameable for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn set_name(&mut self, name: String) {
        (**self).set_name(name)
    }
}
