/// Generates the lookup methods every store-backed client exposes.
#[macro_export]
macro_rules! impl_store_lookups {
    ($client_name:ident, $record:ty, $key:ty, $error:ty, get = $get:ident, list = $list:ident) => {
        #[allow(dead_code)]
        impl $client_name {
            #[tracing::instrument(skip(self))]
            pub async fn $get(&self, key: $key) -> Result<Option<$record>, $error> {
                tracing::debug!("Sending request");
                self.inner.get(key).await.map_err(<$error>::from)
            }

            #[tracing::instrument(skip(self))]
            pub async fn $list(&self) -> Result<Vec<$record>, $error> {
                tracing::debug!("Sending request");
                self.inner.list().await.map_err(<$error>::from)
            }
        }
    };
}

#[macro_export]
macro_rules! impl_client_new {
    ($client_name:ident, $record:ty) => {
        impl $client_name {
            pub fn new(inner: $crate::actor_framework::StoreClient<$record>) -> Self {
                Self { inner }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_store_client {
    ($client_name:ident, $record:ty, $key:ty, $error:ty, get = $get:ident, list = $list:ident) => {
        $crate::impl_client_new!($client_name, $record);
        $crate::impl_store_lookups!($client_name, $record, $key, $error, get = $get, list = $list);
    };
}
